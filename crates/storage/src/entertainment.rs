use chrono::{DateTime, Utc};

use cabin_core::model::{ContentError, ContentId, ContentItem, Platform};

use crate::seq::IdSeq;

/// Fields the caller supplies when adding a watchlist or recommendation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub title: String,
    pub platform: Platform,
    pub duration_minutes: u32,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
}

/// Per-platform sync preference. Enabling stamps `last_sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformPref {
    pub enabled: bool,
    pub last_sync: Option<DateTime<Utc>>,
}

/// Watchlist, recommendations and viewing totals.
#[derive(Debug, Clone, PartialEq)]
pub struct EntertainmentSlice {
    watchlist: Vec<ContentItem>,
    recommendations: Vec<ContentItem>,
    total_watch_minutes: u32,
    netflix: PlatformPref,
    youtube: PlatformPref,
    apple_tv: PlatformPref,
    local: PlatformPref,
    content_ids: IdSeq,
}

impl EntertainmentSlice {
    /// Only local playback is enabled out of the box; streaming platforms are
    /// opt-in. There is no network, so the toggle is a stated preference.
    #[must_use]
    pub fn new() -> Self {
        Self {
            watchlist: Vec::new(),
            recommendations: Vec::new(),
            total_watch_minutes: 0,
            netflix: PlatformPref::default(),
            youtube: PlatformPref::default(),
            apple_tv: PlatformPref::default(),
            local: PlatformPref {
                enabled: true,
                last_sync: None,
            },
            content_ids: IdSeq::starting_at(1),
        }
    }

    // Reads

    #[must_use]
    pub fn watchlist(&self) -> &[ContentItem] {
        &self.watchlist
    }

    #[must_use]
    pub fn recommendations(&self) -> &[ContentItem] {
        &self.recommendations
    }

    #[must_use]
    pub fn total_watch_minutes(&self) -> u32 {
        self.total_watch_minutes
    }

    #[must_use]
    pub fn item(&self, id: ContentId) -> Option<&ContentItem> {
        self.watchlist.iter().find(|i| i.id() == id)
    }

    #[must_use]
    pub fn platform(&self, platform: Platform) -> PlatformPref {
        *self.pref(platform)
    }

    fn pref(&self, platform: Platform) -> &PlatformPref {
        match platform {
            Platform::Netflix => &self.netflix,
            Platform::Youtube => &self.youtube,
            Platform::AppleTv => &self.apple_tv,
            Platform::Local => &self.local,
        }
    }

    fn pref_mut(&mut self, platform: Platform) -> &mut PlatformPref {
        match platform {
            Platform::Netflix => &mut self.netflix,
            Platform::Youtube => &mut self.youtube,
            Platform::AppleTv => &mut self.apple_tv,
            Platform::Local => &mut self.local,
        }
    }

    // Watchlist

    /// # Errors
    ///
    /// Returns `ContentError` if the supplied fields fail validation.
    pub fn add_to_watchlist(&mut self, new: NewContent) -> Result<ContentId, ContentError> {
        let id = ContentId::new(self.content_ids.next());
        self.watchlist.push(build_item(id, new)?);
        Ok(id)
    }

    /// Removes and returns the item; unknown ids return `None`.
    pub fn remove_from_watchlist(&mut self, id: ContentId) -> Option<ContentItem> {
        let index = self.watchlist.iter().position(|i| i.id() == id)?;
        Some(self.watchlist.remove(index))
    }

    /// Move the item at `from` to position `to`. Out-of-range indices are a
    /// no-op returning `false`.
    pub fn reorder_watchlist(&mut self, from: usize, to: usize) -> bool {
        if from >= self.watchlist.len() || to >= self.watchlist.len() {
            return false;
        }
        let item = self.watchlist.remove(from);
        self.watchlist.insert(to, item);
        true
    }

    pub fn mark_completed(&mut self, id: ContentId) -> bool {
        match self.watchlist.iter_mut().find(|i| i.id() == id) {
            Some(item) => {
                item.mark_completed();
                true
            }
            None => false,
        }
    }

    pub fn add_watch_minutes(&mut self, minutes: u32) {
        self.total_watch_minutes = self.total_watch_minutes.saturating_add(minutes);
    }

    // Platforms

    pub fn set_platform_enabled(&mut self, platform: Platform, enabled: bool, now: DateTime<Utc>) {
        let pref = self.pref_mut(platform);
        pref.enabled = enabled;
        pref.last_sync = enabled.then_some(now);
    }

    // Recommendations

    /// # Errors
    ///
    /// Returns `ContentError` if the supplied fields fail validation.
    pub fn add_recommendation(&mut self, new: NewContent) -> Result<ContentId, ContentError> {
        let id = ContentId::new(self.content_ids.next());
        self.recommendations.push(build_item(id, new)?);
        Ok(id)
    }

    /// Move a recommendation into the watchlist, keeping its id.
    pub fn promote_recommendation(&mut self, id: ContentId) -> bool {
        let Some(index) = self.recommendations.iter().position(|i| i.id() == id) else {
            return false;
        };
        let item = self.recommendations.remove(index);
        self.watchlist.push(item);
        true
    }

    pub fn clear_recommendations(&mut self) {
        self.recommendations.clear();
    }
}

impl Default for EntertainmentSlice {
    fn default() -> Self {
        Self::new()
    }
}

fn build_item(id: ContentId, new: NewContent) -> Result<ContentItem, ContentError> {
    let mut item = ContentItem::new(id, new.title, new.platform, new.duration_minutes)?;
    if let Some(genre) = new.genre {
        item = item.with_genre(genre);
    }
    if let Some(language) = new.language {
        item = item.with_language(language);
    }
    if let Some(description) = new.description {
        item = item.with_description(description);
    }
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_core::time::fixed_now;

    fn film(title: &str) -> NewContent {
        NewContent {
            title: title.to_owned(),
            platform: Platform::Local,
            duration_minutes: 95,
            genre: None,
            language: None,
            description: None,
        }
    }

    #[test]
    fn local_platform_enabled_by_default() {
        let slice = EntertainmentSlice::new();
        assert!(slice.platform(Platform::Local).enabled);
        assert!(!slice.platform(Platform::Netflix).enabled);
    }

    #[test]
    fn enabling_a_platform_stamps_last_sync() {
        let mut slice = EntertainmentSlice::new();
        slice.set_platform_enabled(Platform::Youtube, true, fixed_now());
        assert_eq!(slice.platform(Platform::Youtube).last_sync, Some(fixed_now()));

        slice.set_platform_enabled(Platform::Youtube, false, fixed_now());
        assert_eq!(slice.platform(Platform::Youtube).last_sync, None);
    }

    #[test]
    fn reorder_moves_items_and_checks_bounds() {
        let mut slice = EntertainmentSlice::new();
        let a = slice.add_to_watchlist(film("A")).unwrap();
        let _b = slice.add_to_watchlist(film("B")).unwrap();
        let c = slice.add_to_watchlist(film("C")).unwrap();

        assert!(slice.reorder_watchlist(2, 0));
        assert_eq!(slice.watchlist()[0].id(), c);
        assert_eq!(slice.watchlist()[1].id(), a);

        assert!(!slice.reorder_watchlist(0, 5));
    }

    #[test]
    fn promote_recommendation_keeps_id() {
        let mut slice = EntertainmentSlice::new();
        let id = slice.add_recommendation(film("Queen of Katwe")).unwrap();
        assert!(slice.promote_recommendation(id));
        assert!(slice.recommendations().is_empty());
        assert_eq!(slice.item(id).unwrap().title(), "Queen of Katwe");

        assert!(!slice.promote_recommendation(id));
    }

    #[test]
    fn unknown_item_mutations_are_noops() {
        let mut slice = EntertainmentSlice::new();
        let ghost = ContentId::new(404);
        assert!(!slice.mark_completed(ghost));
        assert!(slice.remove_from_watchlist(ghost).is_none());
    }
}
