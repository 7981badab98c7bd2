use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{BookId, NoteId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BookError {
    #[error("book title cannot be empty")]
    EmptyTitle,
}

//
// ─── FORMAT & NOTES ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookFormat {
    Epub,
    Pdf,
    Article,
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookFormat::Epub => "epub",
            BookFormat::Pdf => "pdf",
            BookFormat::Article => "article",
        };
        f.write_str(label)
    }
}

/// A page-anchored note, independently removable by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub page: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

//
// ─── BOOK ──────────────────────────────────────────────────────────────────────
//

/// A library entry with derived reading progress and owned sub-collections.
///
/// `progress()` is always recomputed from `current_page / total_pages`;
/// bookmarks have set semantics, notes are an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    format: BookFormat,
    total_pages: u32,
    current_page: u32,
    language: String,
    description: Option<String>,
    reading_minutes: u32,
    last_read: Option<DateTime<Utc>>,
    bookmarks: Vec<u32>,
    notes: Vec<Note>,
}

impl Book {
    /// Creates a new book with zero progress and empty sub-collections.
    ///
    /// # Errors
    ///
    /// Returns `BookError::EmptyTitle` if the title is empty or whitespace-only.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        format: BookFormat,
        total_pages: u32,
    ) -> Result<Self, BookError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(BookError::EmptyTitle);
        }
        let author = author.into();
        let author = if author.trim().is_empty() {
            "Unknown".to_owned()
        } else {
            author.trim().to_owned()
        };

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            author,
            format,
            total_pages,
            current_page: 0,
            language: "English".to_owned(),
            description: None,
            reading_minutes: 0,
            last_read: None,
            bookmarks: Vec::new(),
            notes: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = Some(description).filter(|d| !d.trim().is_empty());
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[must_use]
    pub fn format(&self) -> BookFormat {
        self.format
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn reading_minutes(&self) -> u32 {
        self.reading_minutes
    }

    #[must_use]
    pub fn last_read(&self) -> Option<DateTime<Utc>> {
        self.last_read
    }

    #[must_use]
    pub fn bookmarks(&self) -> &[u32] {
        &self.bookmarks
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Fraction read, recomputed on every call and clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (f64::from(self.current_page) / f64::from(self.total_pages)).clamp(0.0, 1.0)
    }

    // Mutations

    /// Set the current page, clamped into `[0, total_pages]`, stamping `last_read`.
    pub fn set_current_page(&mut self, page: u32, now: DateTime<Utc>) {
        self.current_page = page.min(self.total_pages);
        self.last_read = Some(now);
    }

    /// Advance the current page by `pages`, clamped to the page count.
    pub fn advance_pages(&mut self, pages: u32, now: DateTime<Utc>) {
        let target = self.current_page.saturating_add(pages);
        self.set_current_page(target, now);
    }

    pub fn add_reading_minutes(&mut self, minutes: u32) {
        self.reading_minutes = self.reading_minutes.saturating_add(minutes);
    }

    /// Idempotent: a page already bookmarked is left as the single entry.
    /// Returns whether the bookmark was added.
    pub fn add_bookmark(&mut self, page: u32) -> bool {
        if self.bookmarks.contains(&page) {
            return false;
        }
        self.bookmarks.push(page);
        true
    }

    /// Returns whether a bookmark was removed; absent pages are a no-op.
    pub fn remove_bookmark(&mut self, page: u32) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|p| *p != page);
        self.bookmarks.len() != before
    }

    /// Append a note with a fresh id and creation timestamp.
    pub fn add_note(
        &mut self,
        page: u32,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> NoteId {
        let id = NoteId::new();
        self.notes.push(Note {
            id,
            page,
            content: content.into(),
            created_at: now,
        });
        id
    }

    /// Returns whether a note was removed; unknown ids are a no-op.
    pub fn remove_note(&mut self, note_id: NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != note_id);
        self.notes.len() != before
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
