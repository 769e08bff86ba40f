//! Passengers

use std::fmt;

use crate::country::CountryCode;
use crate::error::Result;
use crate::ids::FlightId;

/// A passenger with at most one associated flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passenger {
    identifier: String,
    name: String,
    country_code: CountryCode,
    flight: Option<FlightId>,
}

impl Passenger {
    /// Create an unassigned passenger
    ///
    /// `identifier` and `name` are stored verbatim; only the country code
    /// is validated.
    pub fn new(identifier: impl Into<String>, name: impl Into<String>, country_code: &str) -> Result<Self> {
        let country_code = CountryCode::new(country_code)?;
        Ok(Self {
            identifier: identifier.into(),
            name: name.into(),
            country_code,
            flight: None,
        })
    }

    /// Get the identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Get the name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the country code
    pub fn country_code(&self) -> &CountryCode {
        &self.country_code
    }

    /// Get the flight this passenger refers to, if any
    pub fn flight(&self) -> Option<FlightId> {
        self.flight
    }

    /// Overwrite the flight reference with no effect on any flight's seats
    ///
    /// This can leave the association inconsistent. Prefer
    /// [`crate::Roster::join_flight`].
    pub fn set_flight(&mut self, flight: Option<FlightId>) {
        self.flight = flight;
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Passenger {} with identifier: {} from {}",
            self.name, self.identifier, self.country_code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn valid_passenger() {
        let passenger = Passenger::new("12345678A", "John Doe", "ES").unwrap();
        assert_eq!(passenger.identifier(), "12345678A");
        assert_eq!(passenger.name(), "John Doe");
        assert_eq!(passenger.country_code(), &"ES");
        assert_eq!(passenger.flight(), None);
    }

    #[test]
    fn identifier_is_not_validated() {
        let passenger = Passenger::new("", "", "FR").unwrap();
        assert_eq!(passenger.identifier(), "");
    }

    #[test]
    fn invalid_country_code() {
        let err = Passenger::new("12345678A", "John Doe", "XX").unwrap_err();
        assert_eq!(err, Error::InvalidArgument("Invalid country code".into()));
    }

    #[test]
    fn display() {
        let passenger = Passenger::new("P1", "John Doe", "ES").unwrap();
        assert_eq!(passenger.to_string(), "Passenger John Doe with identifier: P1 from ES");
    }

    #[test]
    fn set_flight_overwrites() {
        let mut passenger = Passenger::new("P1", "John Doe", "ES").unwrap();
        passenger.set_flight(Some(FlightId::new(4)));
        assert_eq!(passenger.flight(), Some(FlightId::new(4)));
        passenger.set_flight(None);
        assert_eq!(passenger.flight(), None);
    }
}
