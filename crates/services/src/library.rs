use tracing::{info, warn};

use cabin_core::Clock;
use cabin_core::model::{Book, BookFormat, BookId, SessionId};
use cabin_core::session::Subject;
use storage::{AppState, NewBook};

use crate::error::{LibraryError, UploadError};
use crate::timer::SessionTimer;

/// Upload size ceiling, 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// A file the user picked for import, already read by the host shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// Map a MIME type to a shelf format. Unlisted types are rejected.
#[must_use]
pub fn format_for_mime(mime: &str) -> Option<BookFormat> {
    match mime {
        "application/epub+zip" => Some(BookFormat::Epub),
        "application/pdf" => Some(BookFormat::Pdf),
        "text/plain" => Some(BookFormat::Article),
        _ => None,
    }
}

/// Library curation: imports, removals and starting reading sessions.
#[derive(Debug, Clone, Copy)]
pub struct LibraryService {
    timer: SessionTimer,
}

impl LibraryService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            timer: SessionTimer::new(clock),
        }
    }

    /// Validate an upload and add it to the library.
    ///
    /// The title is the file name without its extension; page count starts at
    /// zero until the reader opens the file. A rejected upload mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::UnsupportedFormat` or `UploadError::TooLarge` on
    /// validation failure.
    pub fn import_upload(
        &self,
        state: &mut AppState,
        upload: Upload,
    ) -> Result<BookId, UploadError> {
        let Some(format) = format_for_mime(&upload.mime_type) else {
            warn!(mime = %upload.mime_type, "upload rejected");
            return Err(UploadError::UnsupportedFormat(upload.mime_type));
        };
        if upload.size_bytes > MAX_UPLOAD_BYTES {
            warn!(size = upload.size_bytes, "upload rejected");
            return Err(UploadError::TooLarge {
                size: upload.size_bytes,
                max: MAX_UPLOAD_BYTES,
            });
        }

        let title = match upload.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_owned(),
            _ => upload.file_name.clone(),
        };
        let id = state.reading.add_book(NewBook {
            title,
            author: String::new(),
            format,
            total_pages: 0,
            language: None,
            description: None,
        })?;
        info!(%id, %format, "book imported");
        Ok(id)
    }

    /// Remove a book, cancelling any live reading session against it first.
    pub fn remove_book(&self, state: &mut AppState, id: BookId) -> Option<Book> {
        let live = state.sessions.live_for(Subject::Book(id)).map(|s| s.id());
        if let Some(session_id) = live {
            if self.timer.cancel(state, session_id).is_ok() {
                info!(book = %id, session = %session_id, "cancelled session for removed book");
            }
        }
        state.reading.remove_book(id)
    }

    /// Start a reading session against a book, using the configured defaults
    /// for duration and break cadence.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::UnknownBook` for ids not in the library, or a
    /// timer error if a session is already live for the book.
    pub fn start_reading(
        &self,
        state: &mut AppState,
        id: BookId,
    ) -> Result<SessionId, LibraryError> {
        if state.reading.book(id).is_none() {
            return Err(LibraryError::UnknownBook(id));
        }
        let defaults = state.settings.reading_defaults();
        let interval = defaults
            .notifications_enabled
            .then_some(defaults.break_interval_minutes);
        let session_id =
            self.timer
                .start(state, Subject::Book(id), defaults.session_minutes, interval)?;
        Ok(session_id)
    }
}
