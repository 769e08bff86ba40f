//! Configuration schema (flightroster.toml)

use serde::{Deserialize, Serialize};

/// Output format for scenario runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored human-readable summary
    #[default]
    Text,

    /// Report JSON on stdout
    Json,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seats used when a scenario flight omits `seats`
    #[serde(default = "default_seats")]
    pub default_seats: i32,

    /// Stop replaying a scenario at the first failed step
    #[serde(default)]
    pub fail_fast: bool,

    /// Output format for `run`
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_seats() -> i32 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_seats: default_seats(),
            fail_fast: false,
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
