//! Flights and flight numbers

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::ids::PassengerId;

static FLIGHT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    // Literal pattern; cannot fail to compile
    Regex::new(r"^[A-Z]{2}[0-9]{3,4}$").unwrap()
});

/// A validated flight number: two uppercase letters followed by 3-4 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlightNumber(String);

impl FlightNumber {
    /// Validate and wrap a flight number
    pub fn new(number: &str) -> Result<Self> {
        if !Self::is_valid(number) {
            return Err(Error::InvalidArgument("Invalid flight number".to_string()));
        }
        Ok(Self(number.to_string()))
    }

    /// Check a candidate flight number without allocating
    pub fn is_valid(number: &str) -> bool {
        FLIGHT_NUMBER.is_match(number)
    }

    /// Get the flight number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FlightNumber {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<FlightNumber> for String {
    fn from(number: FlightNumber) -> Self {
        number.0
    }
}

impl PartialEq<&str> for FlightNumber {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A flight with a fixed seat capacity and a set of passengers
///
/// Adding and removing passengers goes through [`crate::Roster`], which
/// keeps the passenger's back-reference in step with this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flight {
    flight_number: FlightNumber,
    seats: i32,
    passengers: HashSet<PassengerId>,
}

impl Flight {
    /// Create an empty flight
    ///
    /// `seats` is not validated; zero or negative means no capacity.
    pub fn new(flight_number: &str, seats: i32) -> Result<Self> {
        Ok(Self {
            flight_number: FlightNumber::new(flight_number)?,
            seats,
            passengers: HashSet::new(),
        })
    }

    /// Get the flight number
    pub fn flight_number(&self) -> &FlightNumber {
        &self.flight_number
    }

    /// Get the seat capacity as given at construction
    pub fn seats(&self) -> i32 {
        self.seats
    }

    /// Number of seated passengers
    pub fn number_of_passengers(&self) -> usize {
        self.passengers.len()
    }

    /// Seats still free, never negative
    pub fn available_seats(&self) -> usize {
        usize::try_from(self.seats)
            .unwrap_or(0)
            .saturating_sub(self.passengers.len())
    }

    /// Check if no seat is free
    pub fn is_full(&self) -> bool {
        self.available_seats() == 0
    }

    /// Check if the passenger holds a seat on this flight
    pub fn contains(&self, passenger: PassengerId) -> bool {
        self.passengers.contains(&passenger)
    }

    /// Passenger handles in no particular order
    pub fn passengers(&self) -> impl Iterator<Item = PassengerId> + '_ {
        self.passengers.iter().copied()
    }

    /// Insert into the seat set after the capacity check
    pub(crate) fn board(&mut self, passenger: PassengerId) -> Result<bool> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                flight_number: self.flight_number.to_string(),
            });
        }
        Ok(self.passengers.insert(passenger))
    }

    pub(crate) fn unboard(&mut self, passenger: PassengerId) -> bool {
        self.passengers.remove(&passenger)
    }
}
