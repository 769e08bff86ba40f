//! Arena handles for flights and passengers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a flight registered in a [`crate::Roster`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(usize);

impl FlightId {
    /// Create a handle from an arena index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the arena index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Handle to a passenger registered in a [`crate::Roster`]
///
/// Set membership on a flight is keyed by this handle, so two passengers
/// with identical data are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassengerId(usize);

impl PassengerId {
    /// Create a handle from an arena index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the arena index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
