use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the tracked flight. Stamped by the flight slice as the user (or
/// the schedule) moves the journey along; not a guarded state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    NotStarted,
    Takeoff,
    Cruise,
    Landing,
    Completed,
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlightPhase::NotStarted => "not started",
            FlightPhase::Takeoff => "takeoff",
            FlightPhase::Cruise => "cruise",
            FlightPhase::Landing => "landing",
            FlightPhase::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// A selectable route in the companion's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRoute {
    pub id: String,
    pub name: String,
    pub from: String,
    pub to: String,
    pub duration_minutes: u32,
    pub description: Option<String>,
}

impl FlightRoute {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            from: from.into(),
            to: to.into(),
            duration_minutes,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
