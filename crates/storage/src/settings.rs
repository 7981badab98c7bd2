use serde::{Deserialize, Serialize};

use cabin_core::model::BookFormat;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Luganda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    pub enabled: bool,
    pub sound: bool,
    pub vibration: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            vibration: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityPrefs {
    pub font_size: u32,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

impl Default for AccessibilityPrefs {
    fn default() -> Self {
        Self {
            font_size: 16,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

/// Defaults applied when a reading session starts without explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingDefaults {
    pub session_minutes: u32,
    pub break_interval_minutes: u32,
    pub break_minutes: u32,
    pub auto_start_breaks: bool,
    pub notifications_enabled: bool,
    pub preferred_format: Option<BookFormat>,
}

impl Default for ReadingDefaults {
    fn default() -> Self {
        Self {
            session_minutes: 30,
            break_interval_minutes: 25,
            break_minutes: 5,
            auto_start_breaks: true,
            notifications_enabled: true,
            preferred_format: None,
        }
    }
}

/// User preferences. All fields have sensible defaults and every setter is
/// total; invalid combinations cannot be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSlice {
    theme: Theme,
    language: Language,
    notifications: NotificationPrefs,
    accessibility: AccessibilityPrefs,
    reading_defaults: ReadingDefaults,
}

impl SettingsSlice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn notifications(&self) -> NotificationPrefs {
        self.notifications
    }

    #[must_use]
    pub fn accessibility(&self) -> AccessibilityPrefs {
        self.accessibility
    }

    #[must_use]
    pub fn reading_defaults(&self) -> ReadingDefaults {
        self.reading_defaults
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_notifications(&mut self, prefs: NotificationPrefs) {
        self.notifications = prefs;
    }

    pub fn set_accessibility(&mut self, prefs: AccessibilityPrefs) {
        self.accessibility = prefs;
    }

    pub fn set_reading_defaults(&mut self, defaults: ReadingDefaults) {
        self.reading_defaults = defaults;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
