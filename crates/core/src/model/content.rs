use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::ContentId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("content title cannot be empty")]
    EmptyTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Netflix,
    Youtube,
    AppleTv,
    Local,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Netflix,
        Platform::Youtube,
        Platform::AppleTv,
        Platform::Local,
    ];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Platform::Netflix => "netflix",
            Platform::Youtube => "youtube",
            Platform::AppleTv => "appletv",
            Platform::Local => "local",
        };
        f.write_str(label)
    }
}

/// A watchlist entry (film, episode, clip) on a streaming platform or stored
/// locally for offline viewing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    id: ContentId,
    title: String,
    platform: Platform,
    duration_minutes: u32,
    completed: bool,
    genre: Option<String>,
    language: Option<String>,
    description: Option<String>,
}

impl ContentItem {
    /// # Errors
    ///
    /// Returns `ContentError::EmptyTitle` if the title is empty or whitespace-only.
    pub fn new(
        id: ContentId,
        title: impl Into<String>,
        platform: Platform,
        duration_minutes: u32,
    ) -> Result<Self, ContentError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ContentError::EmptyTitle);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            platform,
            duration_minutes,
            completed: false,
            genre: None,
            language: None,
            description: None,
        })
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> ContentId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}
