use thiserror::Error;

use cabin_core::model::{BookError, BookId, SessionId};
use cabin_core::session::{SessionError, Subject};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TimerError {
    #[error("a session is already live for {subject}")]
    Conflict { subject: Subject },

    #[error("no active session with id {0}")]
    UnknownSession(SessionId),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UploadError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("file is {size} bytes, the limit is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error(transparent)]
    Book(#[from] BookError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LibraryError {
    #[error("no book with id {0}")]
    UnknownBook(BookId),

    #[error(transparent)]
    Timer(#[from] TimerError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PomodoroError {
    #[error("no focus session is running")]
    NotRunning,

    #[error("a break is already in progress")]
    OnBreak,

    #[error("no break is in progress")]
    NotOnBreak,

    #[error(transparent)]
    Timer(#[from] TimerError),
}
