use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::TimeBlockId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimeBlockError {
    #[error("time block title cannot be empty")]
    MissingTitle,

    #[error("time block duration must be at least one minute")]
    InvalidDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockCategory {
    Work,
    Reading,
    Entertainment,
    Wellness,
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlockCategory::Work => "work",
            BlockCategory::Reading => "reading",
            BlockCategory::Entertainment => "entertainment",
            BlockCategory::Wellness => "wellness",
        };
        f.write_str(label)
    }
}

/// Partial update applied to an existing time block. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeBlockUpdate {
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub category: Option<BlockCategory>,
    pub completed: Option<bool>,
}

/// A planned slot in the flight schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBlock {
    id: TimeBlockId,
    title: String,
    start_time: DateTime<Utc>,
    duration_minutes: u32,
    category: BlockCategory,
    completed: bool,
}

impl TimeBlock {
    /// # Errors
    ///
    /// Returns `TimeBlockError::MissingTitle` for a blank title and
    /// `TimeBlockError::InvalidDuration` for a zero duration.
    pub fn new(
        id: TimeBlockId,
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        duration_minutes: u32,
        category: BlockCategory,
    ) -> Result<Self, TimeBlockError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TimeBlockError::MissingTitle);
        }
        if duration_minutes == 0 {
            return Err(TimeBlockError::InvalidDuration);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            start_time,
            duration_minutes,
            category,
            completed: false,
        })
    }

    #[must_use]
    pub fn id(&self) -> TimeBlockId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn category(&self) -> BlockCategory {
        self.category
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Apply a partial update. Blank titles and zero durations are rejected
    /// with nothing mutated.
    ///
    /// # Errors
    ///
    /// Same validation as [`TimeBlock::new`].
    pub fn apply(&mut self, update: TimeBlockUpdate) -> Result<(), TimeBlockError> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(TimeBlockError::MissingTitle);
            }
        }
        if update.duration_minutes == Some(0) {
            return Err(TimeBlockError::InvalidDuration);
        }

        if let Some(title) = update.title {
            self.title = title.trim().to_owned();
        }
        if let Some(start_time) = update.start_time {
            self.start_time = start_time;
        }
        if let Some(duration) = update.duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        Ok(())
    }
}
