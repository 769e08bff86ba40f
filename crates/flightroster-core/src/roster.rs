//! Roster: arena owning flights and passengers
//!
//! Flights and passengers refer to each other by handle. All operations that
//! touch both sides of the association live here:
//! - `add_passenger` / `remove_passenger`: flight-side seat operations
//! - `set_flight`: raw back-reference overwrite
//! - `join_flight`: the full transition protocol

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::flight::Flight;
use crate::ids::{FlightId, PassengerId};
use crate::passenger::Passenger;

/// A disagreement between a flight's seat set and a passenger's reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    /// The flight seats the passenger, but the passenger points elsewhere
    MissingBackReference {
        flight: FlightId,
        passenger: PassengerId,
    },

    /// The passenger points at the flight, but the flight does not seat them
    MissingSeat {
        passenger: PassengerId,
        flight: FlightId,
    },
}

/// Owner of every flight and passenger in one model
#[derive(Debug, Clone, Default)]
pub struct Roster {
    flights: Vec<Flight>,
    passengers: Vec<Passenger>,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a flight
    ///
    /// Flight numbers are unique within a roster.
    pub fn register_flight(&mut self, flight: Flight) -> Result<FlightId> {
        if self.find_flight(flight.flight_number().as_str()).is_some() {
            return Err(Error::InvalidArgument(format!(
                "Duplicate flight number {}",
                flight.flight_number()
            )));
        }
        let id = FlightId::new(self.flights.len());
        debug!(flight = %flight.flight_number(), %id, seats = flight.seats(), "registered flight");
        self.flights.push(flight);
        Ok(id)
    }

    /// Take ownership of a passenger
    ///
    /// A pre-set flight reference must name a flight in this roster.
    pub fn register_passenger(&mut self, passenger: Passenger) -> Result<PassengerId> {
        if let Some(flight) = passenger.flight() {
            self.flight_ref(flight)?;
        }
        let id = PassengerId::new(self.passengers.len());
        debug!(passenger = passenger.identifier(), %id, "registered passenger");
        self.passengers.push(passenger);
        Ok(id)
    }

    /// Get a flight by handle
    pub fn flight(&self, id: FlightId) -> Option<&Flight> {
        self.flights.get(id.index())
    }

    /// Get a passenger by handle
    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.get(id.index())
    }

    /// All flights in registration order
    pub fn flights(&self) -> impl Iterator<Item = (FlightId, &Flight)> {
        self.flights
            .iter()
            .enumerate()
            .map(|(i, f)| (FlightId::new(i), f))
    }

    /// All passengers in registration order
    pub fn passengers(&self) -> impl Iterator<Item = (PassengerId, &Passenger)> {
        self.passengers
            .iter()
            .enumerate()
            .map(|(i, p)| (PassengerId::new(i), p))
    }

    /// Find a flight by its number
    pub fn find_flight(&self, flight_number: &str) -> Option<FlightId> {
        self.flights()
            .find(|(_, f)| f.flight_number() == &flight_number)
            .map(|(id, _)| id)
    }

    /// Find the first passenger registered with this identifier
    pub fn find_passenger(&self, identifier: &str) -> Option<PassengerId> {
        self.passengers()
            .find(|(_, p)| p.identifier() == identifier)
            .map(|(id, _)| id)
    }

    /// Seat a passenger on a flight
    ///
    /// Fails with `CapacityExceeded` when the flight is full, leaving both
    /// sides untouched. Otherwise the passenger's reference is overwritten
    /// with this flight, even if it pointed at another flight whose seat set
    /// still holds the passenger. Returns `false` if the passenger was
    /// already seated here.
    pub fn add_passenger(&mut self, flight: FlightId, passenger: PassengerId) -> Result<bool> {
        self.passenger_ref(passenger)?;
        let seat_set = self.flights.get_mut(flight.index()).ok_or(Error::UnknownFlight(flight))?;

        let inserted = seat_set.board(passenger).inspect_err(|e| {
            warn!(flight = %seat_set.flight_number(), %passenger, "{e}");
        })?;
        self.passengers[passenger.index()].set_flight(Some(flight));

        debug!(flight = %seat_set.flight_number(), %passenger, inserted, "added passenger");
        Ok(inserted)
    }

    /// Unseat a passenger from a flight
    ///
    /// The passenger's reference is cleared whether or not the flight
    /// seated them. Returns `false` if the flight did not.
    pub fn remove_passenger(&mut self, flight: FlightId, passenger: PassengerId) -> Result<bool> {
        self.passenger_ref(passenger)?;
        let seat_set = self.flights.get_mut(flight.index()).ok_or(Error::UnknownFlight(flight))?;

        self.passengers[passenger.index()].set_flight(None);
        let removed = seat_set.unboard(passenger);

        debug!(flight = %seat_set.flight_number(), %passenger, removed, "removed passenger");
        Ok(removed)
    }

    /// Overwrite a passenger's flight reference without touching any seats
    ///
    /// See [`Passenger::set_flight`].
    pub fn set_flight(&mut self, passenger: PassengerId, flight: Option<FlightId>) -> Result<()> {
        if let Some(flight) = flight {
            self.flight_ref(flight)?;
        }
        let record = self
            .passengers
            .get_mut(passenger.index())
            .ok_or(Error::UnknownPassenger(passenger))?;
        record.set_flight(flight);
        Ok(())
    }

    /// Move a passenger from its current flight (if any) to `new_flight`
    ///
    /// `None` leaves the passenger unassigned. Steps are not rolled back:
    /// if the new flight is full the passenger has already left the old
    /// one, and keeps a reference to the new flight without holding a seat
    /// on it.
    pub fn join_flight(&mut self, passenger: PassengerId, new_flight: Option<FlightId>) -> Result<()> {
        let previous = self.passenger_ref(passenger)?.flight();
        if let Some(flight) = new_flight {
            self.flight_ref(flight)?;
        }

        if let Some(previous) = previous {
            if !self.remove_passenger(previous, passenger)? {
                warn!(%passenger, flight = %previous, "passenger not seated on its own flight");
                return Err(Error::InconsistentState("Cannot remove passenger".to_string()));
            }
        }

        self.passengers[passenger.index()].set_flight(new_flight);

        if let Some(flight) = new_flight {
            if !self.add_passenger(flight, passenger)? {
                warn!(%passenger, %flight, "passenger already seated on target flight");
                return Err(Error::InconsistentState("Cannot add passenger".to_string()));
            }
        }

        debug!(%passenger, ?previous, ?new_flight, "joined flight");
        Ok(())
    }

    /// Every place where the two sides of an association disagree
    pub fn audit(&self) -> Vec<AuditFinding> {
        let mut findings = Vec::new();

        for (flight_id, flight) in self.flights() {
            let mut seated: Vec<_> = flight.passengers().collect();
            seated.sort();
            for passenger in seated {
                if self.passengers[passenger.index()].flight() != Some(flight_id) {
                    findings.push(AuditFinding::MissingBackReference {
                        flight: flight_id,
                        passenger,
                    });
                }
            }
        }

        for (passenger_id, passenger) in self.passengers() {
            if let Some(flight) = passenger.flight() {
                if !self.flights[flight.index()].contains(passenger_id) {
                    findings.push(AuditFinding::MissingSeat {
                        passenger: passenger_id,
                        flight,
                    });
                }
            }
        }

        findings
    }

    fn flight_ref(&self, id: FlightId) -> Result<&Flight> {
        self.flight(id).ok_or(Error::UnknownFlight(id))
    }

    fn passenger_ref(&self, id: PassengerId) -> Result<&Passenger> {
        self.passenger(id).ok_or(Error::UnknownPassenger(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with(seats: &[(&str, i32)], passengers: usize) -> (Roster, Vec<FlightId>, Vec<PassengerId>) {
        let mut roster = Roster::new();
        let flights = seats
            .iter()
            .map(|(number, seats)| roster.register_flight(Flight::new(number, *seats).unwrap()).unwrap())
            .collect();
        let passengers = (0..passengers)
            .map(|i| {
                let passenger = Passenger::new(format!("P{i}"), format!("Passenger {i}"), "ES").unwrap();
                roster.register_passenger(passenger).unwrap()
            })
            .collect();
        (roster, flights, passengers)
    }

    #[test]
    fn add_and_remove_round_trip() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100)], 1);

        assert!(roster.add_passenger(f[0], p[0]).unwrap());
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 1);
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), Some(f[0]));

        assert!(roster.remove_passenger(f[0], p[0]).unwrap());
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 0);
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), None);
    }

    #[test]
    fn add_twice_returns_false() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100)], 1);
        assert!(roster.add_passenger(f[0], p[0]).unwrap());
        assert!(!roster.add_passenger(f[0], p[0]).unwrap());
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 1);
    }

    #[test]
    fn add_without_insert_still_overwrites_reference() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100), ("BB1234", 100)], 1);
        assert!(roster.add_passenger(f[0], p[0]).unwrap());
        roster.set_flight(p[0], Some(f[1])).unwrap();

        assert!(!roster.add_passenger(f[0], p[0]).unwrap());
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), Some(f[0]));
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 1);
        assert_eq!(roster.flight(f[1]).unwrap().number_of_passengers(), 0);
    }

    #[test]
    fn capacity_is_enforced() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 3)], 4);
        for passenger in &p[..3] {
            assert!(roster.add_passenger(f[0], *passenger).unwrap());
        }

        let err = roster.add_passenger(f[0], p[3]).unwrap_err();
        assert_eq!(err, Error::CapacityExceeded { flight_number: "AA1234".into() });
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 3);
        assert_eq!(roster.passenger(p[3]).unwrap().flight(), None);
    }

    #[test]
    fn remove_absent_passenger_still_clears_reference() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100), ("BB1234", 100)], 1);
        roster.add_passenger(f[1], p[0]).unwrap();

        assert!(!roster.remove_passenger(f[0], p[0]).unwrap());
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), None);
        assert_eq!(roster.flight(f[1]).unwrap().number_of_passengers(), 1);
    }

    #[test]
    fn join_moves_between_flights() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100), ("BB1234", 100)], 1);

        roster.join_flight(p[0], Some(f[0])).unwrap();
        roster.join_flight(p[0], Some(f[1])).unwrap();

        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 0);
        assert_eq!(roster.flight(f[1]).unwrap().number_of_passengers(), 1);
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), Some(f[1]));
        assert!(roster.audit().is_empty());
    }

    #[test]
    fn join_none_leaves_flight() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100)], 1);
        roster.join_flight(p[0], Some(f[0])).unwrap();
        roster.join_flight(p[0], None).unwrap();
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 0);
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), None);
    }

    #[test]
    fn join_after_set_flight_is_inconsistent() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100)], 1);
        roster.set_flight(p[0], Some(f[0])).unwrap();
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 0);

        let err = roster.join_flight(p[0], Some(f[0])).unwrap_err();
        assert_eq!(err, Error::InconsistentState("Cannot remove passenger".into()));
        // remove_passenger already cleared the reference
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), None);
    }

    #[test]
    fn join_into_stale_seat_is_inconsistent() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100)], 1);
        roster.add_passenger(f[0], p[0]).unwrap();
        roster.set_flight(p[0], None).unwrap();

        let err = roster.join_flight(p[0], Some(f[0])).unwrap_err();
        assert_eq!(err, Error::InconsistentState("Cannot add passenger".into()));
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), Some(f[0]));
    }

    #[test]
    fn full_target_leaves_passenger_without_seat() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100), ("BB1234", 1)], 2);
        roster.join_flight(p[1], Some(f[1])).unwrap();
        roster.join_flight(p[0], Some(f[0])).unwrap();

        let err = roster.join_flight(p[0], Some(f[1])).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { .. }));
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 0);
        assert_eq!(roster.flight(f[1]).unwrap().number_of_passengers(), 1);
        // join_flight set the reference before the add failed
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), Some(f[1]));
        assert_eq!(
            roster.audit(),
            vec![AuditFinding::MissingSeat { passenger: p[0], flight: f[1] }]
        );
    }

    #[test]
    fn add_passenger_seated_elsewhere_leaves_stale_seat() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100), ("BB1234", 100)], 1);
        roster.add_passenger(f[0], p[0]).unwrap();
        roster.add_passenger(f[1], p[0]).unwrap();

        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 1);
        assert_eq!(roster.flight(f[1]).unwrap().number_of_passengers(), 1);
        assert_eq!(
            roster.audit(),
            vec![AuditFinding::MissingBackReference { flight: f[0], passenger: p[0] }]
        );
    }

    #[test]
    fn duplicate_flight_number_rejected() {
        let (mut roster, _, _) = roster_with(&[("AA1234", 100)], 0);
        let err = roster.register_flight(Flight::new("AA1234", 5).unwrap()).unwrap_err();
        assert_eq!(err, Error::InvalidArgument("Duplicate flight number AA1234".into()));
    }

    #[test]
    fn unknown_handles_do_not_mutate() {
        let (mut roster, f, p) = roster_with(&[("AA1234", 100)], 1);
        roster.join_flight(p[0], Some(f[0])).unwrap();

        let err = roster.join_flight(p[0], Some(FlightId::new(9))).unwrap_err();
        assert_eq!(err, Error::UnknownFlight(FlightId::new(9)));
        assert_eq!(roster.passenger(p[0]).unwrap().flight(), Some(f[0]));
        assert_eq!(roster.flight(f[0]).unwrap().number_of_passengers(), 1);

        assert_eq!(
            roster.add_passenger(f[0], PassengerId::new(7)).unwrap_err(),
            Error::UnknownPassenger(PassengerId::new(7))
        );
    }

    #[test]
    fn register_passenger_checks_preset_flight() {
        let mut roster = Roster::new();
        let mut passenger = Passenger::new("P1", "John", "ES").unwrap();
        passenger.set_flight(Some(FlightId::new(0)));
        assert_eq!(
            roster.register_passenger(passenger).unwrap_err(),
            Error::UnknownFlight(FlightId::new(0))
        );
    }
}
