//! Application services: the session timer, pomodoro cadence, library
//! curation and the tick source that drives interactive polling.
//!
//! Services are stateless apart from a [`Clock`]; they mutate an
//! [`storage::AppState`] passed in per call, so tests construct state and
//! services independently and drive time explicitly.

#![forbid(unsafe_code)]

pub mod error;
pub mod library;
pub mod pomodoro;
pub mod ticker;
pub mod timer;

pub use cabin_core::Clock;
pub use error::{LibraryError, PomodoroError, TimerError, UploadError};
pub use library::{LibraryService, MAX_UPLOAD_BYTES, Upload, format_for_mime};
pub use pomodoro::{BreakPlan, PomodoroService};
pub use ticker::{Tick, Ticker};
pub use timer::{BreakDue, SessionOutcome, SessionTimer};
