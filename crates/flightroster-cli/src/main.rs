use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flightroster_core::{
    AuditFinding, Config, CountryCode, FlightNumber, OutputFormat, Report, Roster, Scenario,
};

/// FlightRoster - flight capacity and passenger assignment checks
#[derive(Parser)]
#[command(name = "flightroster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: flightroster.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single identifier
    Check {
        #[command(subcommand)]
        target: CheckTarget,
    },

    /// Replay a scenario file against a fresh roster
    Run {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Output file for report.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CheckTarget {
    /// Two uppercase letters followed by 3-4 digits
    FlightNumber { value: String },

    /// ISO 3166-1 alpha-2 code
    Country { value: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("flightroster.toml").exists() {
        Config::from_file(Path::new("flightroster.toml"))?
    } else {
        tracing::debug!("No config file found, using defaults");
        Config::default()
    };

    let ok = match cli.command {
        Commands::Check { target } => check_command(&target),
        Commands::Run { scenario, output } => run_command(&config, &scenario, output.as_deref())?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Check command - validate a flight number or country code
fn check_command(target: &CheckTarget) -> bool {
    let (kind, value, valid) = match target {
        CheckTarget::FlightNumber { value } => ("flight number", value, FlightNumber::is_valid(value)),
        CheckTarget::Country { value } => ("country code", value, CountryCode::is_valid(value)),
    };

    if valid {
        println!("{} {} is a valid {}", "✓".green(), value.bold(), kind);
    } else {
        println!("{} {} is not a valid {}", "✗".red(), value.bold(), kind);
    }
    valid
}

/// Run command - replay a scenario and report outcomes
fn run_command(config: &Config, scenario_path: &Path, output: Option<&Path>) -> Result<bool> {
    tracing::info!(path = %scenario_path.display(), "loading scenario");
    let scenario = Scenario::from_file(scenario_path)?;

    let (roster, report) = scenario.replay(config);

    if let Some(path) = output {
        report.save_to_file(path)?;
        tracing::info!(path = %path.display(), "report saved");
    }

    match config.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print_report_summary(&roster, &report),
    }

    Ok(!report.has_failures())
}

fn print_report_summary(roster: &Roster, report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Scenario Replay".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    for outcome in &report.outcomes {
        match &outcome.error {
            None => {
                let note = match outcome.changed {
                    Some(false) => " (no change)".dimmed().to_string(),
                    _ => String::new(),
                };
                println!("  {} {}{}", "✓".green(), outcome.description, note);
            }
            Some(error) => println!(
                "  {} {} {} {}",
                "✗".red(),
                outcome.description,
                format!("[{}]", error.code).yellow(),
                error.message
            ),
        }
    }

    println!();
    println!("{}", "Flights:".bold());
    for flight in &report.roster.flights {
        println!(
            "  {} {}/{} {}",
            flight.number.green(),
            flight.passengers.len(),
            flight.seats,
            flight.passengers.join(", ")
        );
    }

    if !report.audit.is_empty() {
        println!();
        println!("{}", "⚠ Inconsistent associations:".yellow().bold());
        for finding in &report.audit {
            println!("  {}", describe_finding(roster, finding).yellow());
        }
    }

    println!();
    println!(
        "{} setup failures, {} steps ok, {} failed, {} skipped",
        report.summary.setup_failures,
        report.summary.steps_succeeded.to_string().green(),
        report.summary.steps_failed.to_string().red(),
        report.summary.steps_skipped
    );
    println!("{}", "=".repeat(60).bright_blue());
}

fn describe_finding(roster: &Roster, finding: &AuditFinding) -> String {
    let (flight, passenger, what) = match finding {
        AuditFinding::MissingBackReference { flight, passenger } => {
            (*flight, *passenger, "seats passenger that refers elsewhere")
        }
        AuditFinding::MissingSeat { passenger, flight } => {
            (*flight, *passenger, "is referenced by an unseated passenger")
        }
    };
    let number = roster
        .flight(flight)
        .map(|f| f.flight_number().to_string())
        .unwrap_or_else(|| flight.to_string());
    let identifier = roster
        .passenger(passenger)
        .map(|p| p.identifier().to_string())
        .unwrap_or_else(|| passenger.to_string());
    format!("{number} {what} {identifier}")
}
