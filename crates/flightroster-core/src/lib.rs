//! FlightRoster Core
//!
//! In-memory model of flights and their passengers.
//! Flights and passengers live in a [`Roster`] and refer to each other by
//! handle; the roster keeps both sides of the association in step.
//! Error codes are part of the public API - never rename them.

pub mod config;
pub mod country;
pub mod error;
pub mod flight;
pub mod ids;
pub mod passenger;
pub mod report;
pub mod roster;
pub mod scenario;

pub use config::{Config, ConfigError, OutputFormat};
pub use country::CountryCode;
pub use error::{Error, Result};
pub use flight::{Flight, FlightNumber};
pub use ids::{FlightId, PassengerId};
pub use passenger::Passenger;
pub use report::{Outcome, OutcomeError, Phase, Report, ReportSummary, ReportVersion, RosterSnapshot};
pub use roster::{AuditFinding, Roster};
pub use scenario::{Scenario, ScenarioError, Step};
