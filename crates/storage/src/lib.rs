//! In-memory state container for the flight companion.
//!
//! There is deliberately no persistence layer: state lives for the duration of
//! one interactive session and is rebuilt from seed data on launch. The
//! container is constructed explicitly and passed to services and tests; there
//! is no process-wide singleton.

#![forbid(unsafe_code)]

pub mod entertainment;
pub mod flight;
pub mod productivity;
pub mod reading;
mod seq;
pub mod sessions;
pub mod settings;
pub mod state;
pub mod wellness;

pub use entertainment::{EntertainmentSlice, NewContent, PlatformPref};
pub use flight::FlightSlice;
pub use productivity::{
    NewTimeBlock, PomodoroPrefs, PomodoroPrefsUpdate, PrefsError, ProductivitySlice,
};
pub use reading::{NewBook, NewGoal, ReadingSlice};
pub use sessions::SessionSlice;
pub use settings::{
    AccessibilityPrefs, Language, NotificationPrefs, ReadingDefaults, SettingsSlice, Theme,
};
pub use state::AppState;
pub use wellness::WellnessSlice;
