//! Replay report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::roster::{AuditFinding, Roster};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Which part of a scenario an outcome belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Registering flights and passengers
    Setup,

    /// Applying a step
    Step,
}

/// Error details attached to a failed outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeError {
    /// Stable error code (e.g. CAPACITY_EXCEEDED)
    pub code: String,

    /// Human-readable message
    pub message: String,
}

/// Result of one setup entry or step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub phase: Phase,

    /// Position within the scenario (setup entries: flights, then passengers)
    pub index: usize,

    pub description: String,

    /// Membership change reported by add/remove steps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

impl Outcome {
    /// Create an outcome for an entry that applied cleanly
    pub fn success(phase: Phase, index: usize, description: impl Into<String>, changed: Option<bool>) -> Self {
        Self {
            phase,
            index,
            description: description.into(),
            changed,
            error: None,
        }
    }

    /// Create an outcome for an entry that returned an error
    pub fn failure(
        phase: Phase,
        index: usize,
        description: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            index,
            description: description.into(),
            changed: None,
            error: Some(OutcomeError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// Check if the entry applied without error
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Flights and passengers that could not be registered
    pub setup_failures: usize,

    /// Steps applied without error
    pub steps_succeeded: usize,

    /// Steps that returned an error
    pub steps_failed: usize,

    /// Steps not attempted because of fail_fast
    pub steps_skipped: usize,

    /// Inconsistencies left in the final roster
    pub audit_findings: usize,
}

/// Final state of one flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSnapshot {
    pub number: String,
    pub seats: i32,

    /// Identifiers of seated passengers, in registration order
    pub passengers: Vec<String>,
}

/// Final state of one passenger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerSnapshot {
    pub identifier: String,
    pub name: String,
    pub country: String,

    /// Flight number the passenger refers to
    pub flight: Option<String>,
}

/// Serializable view of a roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub flights: Vec<FlightSnapshot>,
    pub passengers: Vec<PassengerSnapshot>,
}

impl RosterSnapshot {
    /// Capture the current state of a roster
    pub fn capture(roster: &Roster) -> Self {
        let number_of = |id| {
            roster
                .flight(id)
                .map(|f| f.flight_number().to_string())
        };
        let identifier_of = |id| {
            roster
                .passenger(id)
                .map(|p| p.identifier().to_string())
                .unwrap_or_default()
        };

        let flights = roster
            .flights()
            .map(|(_, flight)| {
                let mut seated: Vec<_> = flight.passengers().collect();
                seated.sort();
                FlightSnapshot {
                    number: flight.flight_number().to_string(),
                    seats: flight.seats(),
                    passengers: seated.into_iter().map(identifier_of).collect(),
                }
            })
            .collect();

        let passengers = roster
            .passengers()
            .map(|(_, passenger)| PassengerSnapshot {
                identifier: passenger.identifier().to_string(),
                name: passenger.name().to_string(),
                country: passenger.country_code().to_string(),
                flight: passenger.flight().and_then(number_of),
            })
            .collect();

        Self { flights, passengers }
    }
}

/// Scenario replay report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Setup and step outcomes in execution order
    pub outcomes: Vec<Outcome>,

    /// Roster state after replay
    pub roster: RosterSnapshot,

    /// Inconsistencies in the final roster
    pub audit: Vec<AuditFinding>,
}

impl Report {
    /// Build a report from replay outcomes and the resulting roster
    pub fn from_outcomes(roster: &Roster, outcomes: Vec<Outcome>, steps_skipped: usize) -> Self {
        let audit = roster.audit();

        let count = |phase: Phase, ok: bool| {
            outcomes
                .iter()
                .filter(|o| o.phase == phase && o.succeeded() == ok)
                .count()
        };
        let summary = ReportSummary {
            setup_failures: count(Phase::Setup, false),
            steps_succeeded: count(Phase::Step, true),
            steps_failed: count(Phase::Step, false),
            steps_skipped,
            audit_findings: audit.len(),
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary,
            outcomes,
            roster: RosterSnapshot::capture(roster),
            audit,
        }
    }

    /// Check if any setup entry or step failed
    pub fn has_failures(&self) -> bool {
        self.summary.setup_failures > 0 || self.summary.steps_failed > 0
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save report to JSON file
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::Flight;
    use crate::passenger::Passenger;
    use pretty_assertions::assert_eq;

    #[test]
    fn report_version_display() {
        assert_eq!(ReportVersion::CURRENT.to_string(), "1.0");
    }

    #[test]
    fn snapshot_captures_both_sides() {
        let mut roster = Roster::new();
        let flight = roster.register_flight(Flight::new("AA1234", 2).unwrap()).unwrap();
        let john = roster.register_passenger(Passenger::new("P1", "John", "ES").unwrap()).unwrap();
        roster.register_passenger(Passenger::new("P2", "Jane", "PT").unwrap()).unwrap();
        roster.join_flight(john, Some(flight)).unwrap();

        assert_eq!(
            RosterSnapshot::capture(&roster),
            RosterSnapshot {
                flights: vec![FlightSnapshot {
                    number: "AA1234".into(),
                    seats: 2,
                    passengers: vec!["P1".into()],
                }],
                passengers: vec![
                    PassengerSnapshot {
                        identifier: "P1".into(),
                        name: "John".into(),
                        country: "ES".into(),
                        flight: Some("AA1234".into()),
                    },
                    PassengerSnapshot {
                        identifier: "P2".into(),
                        name: "Jane".into(),
                        country: "PT".into(),
                        flight: None,
                    },
                ],
            }
        );
    }

    #[test]
    fn summary_counts() {
        let outcomes = vec![
            Outcome::failure(Phase::Setup, 0, "flight A1", "INVALID_ARGUMENT", "Invalid flight number"),
            Outcome::success(Phase::Step, 0, "add P1 to AA1234", Some(true)),
            Outcome::failure(Phase::Step, 1, "join P2 -> AA1234", "CAPACITY_EXCEEDED", "Not enough seats for flight AA1234"),
        ];
        let report = Report::from_outcomes(&Roster::new(), outcomes, 0);

        assert_eq!(report.summary.setup_failures, 1);
        assert_eq!(report.summary.steps_succeeded, 1);
        assert_eq!(report.summary.steps_failed, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn report_serialization() {
        let outcomes = vec![Outcome::failure(Phase::Step, 0, "leave P9", "UNRESOLVED_REFERENCE", "No passenger with identifier P9")];
        let json = Report::from_outcomes(&Roster::new(), outcomes, 0).to_json().unwrap();
        assert!(json.contains("UNRESOLVED_REFERENCE"));
        assert!(json.contains("\"phase\": \"step\""));
        assert!(!json.contains("\"changed\""));
    }
}
