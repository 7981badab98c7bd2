use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::GoalId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GoalError {
    #[error("goal target must be greater than zero")]
    InvalidTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalKind {
    Pages,
    Books,
    Time,
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalKind::Pages => "pages",
            GoalKind::Books => "books",
            GoalKind::Time => "time",
        };
        f.write_str(label)
    }
}

/// A target with derived completion.
///
/// `completed()` is recomputed from the current value on every read and is
/// deliberately not sticky: dropping below the target un-completes the goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    id: GoalId,
    title: Option<String>,
    kind: GoalKind,
    target: u32,
    current: u32,
    deadline: DateTime<Utc>,
    unit: String,
}

impl Goal {
    /// # Errors
    ///
    /// Returns `GoalError::InvalidTarget` if `target` is zero.
    pub fn new(
        id: GoalId,
        title: Option<String>,
        kind: GoalKind,
        target: u32,
        deadline: DateTime<Utc>,
        unit: impl Into<String>,
    ) -> Result<Self, GoalError> {
        if target == 0 {
            return Err(GoalError::InvalidTarget);
        }

        Ok(Self {
            id,
            title: title.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()),
            kind,
            target,
            current: 0,
            deadline,
            unit: unit.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> GoalId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> GoalKind {
        self.kind
    }

    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }

    #[must_use]
    pub fn current(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Derived on read; never stored.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.current >= self.target
    }

    /// Fraction of the target reached, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (f64::from(self.current) / f64::from(self.target)).clamp(0.0, 1.0)
    }

    pub fn set_current(&mut self, value: u32) {
        self.current = value;
    }

    pub fn add_progress(&mut self, delta: u32) {
        self.current = self.current.saturating_add(delta);
    }
}
