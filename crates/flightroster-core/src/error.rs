//! Error taxonomy for the flight/passenger model
//!
//! Error codes are stable strings used in scenario reports.
//! Do not rename them.

use crate::ids::{FlightId, PassengerId};

/// Errors raised by model operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A flight number or country code failed validation
    #[error("{0}")]
    InvalidArgument(String),

    /// A passenger was added to a flight with no free seat
    #[error("Not enough seats for flight {flight_number}")]
    CapacityExceeded { flight_number: String },

    /// The two sides of a flight/passenger association disagree
    #[error("{0}")]
    InconsistentState(String),

    /// The flight handle does not belong to this roster
    #[error("Unknown flight handle {0}")]
    UnknownFlight(FlightId),

    /// The passenger handle does not belong to this roster
    #[error("Unknown passenger handle {0}")]
    UnknownPassenger(PassengerId),
}

impl Error {
    /// Get the error as a stable string identifier
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::InconsistentState(_) => "INCONSISTENT_STATE",
            Self::UnknownFlight(_) => "UNKNOWN_FLIGHT",
            Self::UnknownPassenger(_) => "UNKNOWN_PASSENGER",
        }
    }
}

/// Result alias for model operations
pub type Result<T> = std::result::Result<T, Error>;
