//! Scenario files: a roster setup plus a sequence of operations
//!
//! Replaying a scenario builds a fresh [`Roster`] and records the outcome of
//! every setup entry and step in a [`Report`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Error;
use crate::flight::Flight;
use crate::ids::{FlightId, PassengerId};
use crate::passenger::Passenger;
use crate::report::{Outcome, Phase, Report};
use crate::roster::Roster;

/// A flight to register before the steps run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSpec {
    pub number: String,

    /// Falls back to `Config::default_seats`
    #[serde(default)]
    pub seats: Option<i32>,
}

/// A passenger to register before the steps run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerSpec {
    pub identifier: String,
    pub name: String,
    pub country: String,
}

/// One operation against the roster
///
/// Passengers are named by identifier (first registered match), flights by
/// flight number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    /// `Roster::join_flight`; no flight means leave
    Join {
        passenger: String,
        #[serde(default)]
        flight: Option<String>,
    },

    /// `Roster::join_flight` with no target
    Leave { passenger: String },

    /// `Roster::add_passenger`
    Add { passenger: String, flight: String },

    /// `Roster::remove_passenger`
    Remove { passenger: String, flight: String },

    /// `Roster::set_flight`
    Set {
        passenger: String,
        #[serde(default)]
        flight: Option<String>,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join { passenger, flight: Some(flight) } => write!(f, "join {passenger} -> {flight}"),
            Self::Join { passenger, flight: None } | Self::Leave { passenger } => write!(f, "leave {passenger}"),
            Self::Add { passenger, flight } => write!(f, "add {passenger} to {flight}"),
            Self::Remove { passenger, flight } => write!(f, "remove {passenger} from {flight}"),
            Self::Set { passenger, flight: Some(flight) } => write!(f, "set {passenger} -> {flight}"),
            Self::Set { passenger, flight: None } => write!(f, "set {passenger} -> none"),
        }
    }
}

/// A complete scenario file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub flights: Vec<FlightSpec>,

    #[serde(default)]
    pub passengers: Vec<PassengerSpec>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Why a step could not be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum StepError {
    #[error(transparent)]
    Model(#[from] Error),

    #[error("No passenger with identifier {0}")]
    UnknownPassenger(String),

    #[error("No flight with number {0}")]
    UnknownFlight(String),
}

impl StepError {
    fn code(&self) -> &'static str {
        match self {
            Self::Model(e) => e.code(),
            Self::UnknownPassenger(_) | Self::UnknownFlight(_) => "UNRESOLVED_REFERENCE",
        }
    }
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScenarioError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Parse a scenario from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ScenarioError> {
        toml::from_str(toml)
            .map_err(|e| ScenarioError::ParseError(e.to_string()))
    }

    /// Build a roster from the setup and apply every step
    pub fn replay(&self, config: &Config) -> (Roster, Report) {
        let mut roster = Roster::new();
        let mut outcomes = Vec::new();
        let mut halted = false;

        for (index, spec) in self.flights.iter().enumerate() {
            let seats = spec.seats.unwrap_or(config.default_seats);
            let result = Flight::new(&spec.number, seats).and_then(|f| roster.register_flight(f));
            let outcome = Outcome::from_result(
                Phase::Setup,
                index,
                format!("flight {} ({} seats)", spec.number, seats),
                result.map(|_| None).map_err(StepError::from),
            );
            halted |= config.fail_fast && !outcome.succeeded();
            outcomes.push(outcome);
        }

        for (index, spec) in self.passengers.iter().enumerate() {
            let result = Passenger::new(spec.identifier.as_str(), spec.name.as_str(), &spec.country)
                .and_then(|p| roster.register_passenger(p));
            let outcome = Outcome::from_result(
                Phase::Setup,
                self.flights.len() + index,
                format!("passenger {} ({}, {})", spec.identifier, spec.name, spec.country),
                result.map(|_| None).map_err(StepError::from),
            );
            halted |= config.fail_fast && !outcome.succeeded();
            outcomes.push(outcome);
        }

        let mut skipped = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if halted {
                skipped = self.steps.len() - index;
                info!(skipped, "fail_fast set, stopping replay");
                break;
            }
            let result = apply(&mut roster, step);
            debug!(step = %step, ok = result.is_ok(), "applied step");
            let outcome = Outcome::from_result(Phase::Step, index, step.to_string(), result);
            halted |= config.fail_fast && !outcome.succeeded();
            outcomes.push(outcome);
        }

        let report = Report::from_outcomes(&roster, outcomes, skipped);
        (roster, report)
    }
}

fn apply(roster: &mut Roster, step: &Step) -> Result<Option<bool>, StepError> {
    match step {
        Step::Join { passenger, flight } => {
            let passenger = resolve_passenger(roster, passenger)?;
            let flight = flight.as_deref().map(|f| resolve_flight(roster, f)).transpose()?;
            roster.join_flight(passenger, flight)?;
            Ok(None)
        }
        Step::Leave { passenger } => {
            let passenger = resolve_passenger(roster, passenger)?;
            roster.join_flight(passenger, None)?;
            Ok(None)
        }
        Step::Add { passenger, flight } => {
            let passenger = resolve_passenger(roster, passenger)?;
            let flight = resolve_flight(roster, flight)?;
            Ok(Some(roster.add_passenger(flight, passenger)?))
        }
        Step::Remove { passenger, flight } => {
            let passenger = resolve_passenger(roster, passenger)?;
            let flight = resolve_flight(roster, flight)?;
            Ok(Some(roster.remove_passenger(flight, passenger)?))
        }
        Step::Set { passenger, flight } => {
            let passenger = resolve_passenger(roster, passenger)?;
            let flight = flight.as_deref().map(|f| resolve_flight(roster, f)).transpose()?;
            roster.set_flight(passenger, flight)?;
            Ok(None)
        }
    }
}

fn resolve_passenger(roster: &Roster, identifier: &str) -> Result<PassengerId, StepError> {
    roster
        .find_passenger(identifier)
        .ok_or_else(|| StepError::UnknownPassenger(identifier.to_string()))
}

fn resolve_flight(roster: &Roster, number: &str) -> Result<FlightId, StepError> {
    roster
        .find_flight(number)
        .ok_or_else(|| StepError::UnknownFlight(number.to_string()))
}

impl Outcome {
    fn from_result(phase: Phase, index: usize, description: String, result: Result<Option<bool>, StepError>) -> Self {
        match result {
            Ok(changed) => Self::success(phase, index, description, changed),
            Err(e) => Self::failure(phase, index, description, e.code(), e.to_string()),
        }
    }
}

/// Scenario loading errors
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse scenario: {0}")]
    ParseError(String),
}
