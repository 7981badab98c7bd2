use chrono::{DateTime, Utc};

/// Hydration, movement and screen-time metrics for the current flight.
///
/// Every operation here is total; the slice is reset wholesale between
/// flights rather than edited per-field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WellnessSlice {
    water_intake_ml: u32,
    last_water_intake: Option<DateTime<Utc>>,
    movement_streak: u32,
    last_movement: Option<DateTime<Utc>>,
    screen_minutes: u32,
    last_break: Option<DateTime<Utc>>,
    exercises_completed: Vec<String>,
}

impl WellnessSlice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn water_intake_ml(&self) -> u32 {
        self.water_intake_ml
    }

    #[must_use]
    pub fn last_water_intake(&self) -> Option<DateTime<Utc>> {
        self.last_water_intake
    }

    #[must_use]
    pub fn movement_streak(&self) -> u32 {
        self.movement_streak
    }

    #[must_use]
    pub fn last_movement(&self) -> Option<DateTime<Utc>> {
        self.last_movement
    }

    #[must_use]
    pub fn screen_minutes(&self) -> u32 {
        self.screen_minutes
    }

    #[must_use]
    pub fn last_break(&self) -> Option<DateTime<Utc>> {
        self.last_break
    }

    #[must_use]
    pub fn exercises_completed(&self) -> &[String] {
        &self.exercises_completed
    }

    pub fn add_water(&mut self, ml: u32, now: DateTime<Utc>) {
        self.water_intake_ml = self.water_intake_ml.saturating_add(ml);
        self.last_water_intake = Some(now);
    }

    pub fn record_movement(&mut self, now: DateTime<Utc>) {
        self.movement_streak = self.movement_streak.saturating_add(1);
        self.last_movement = Some(now);
    }

    pub fn add_screen_minutes(&mut self, minutes: u32) {
        self.screen_minutes = self.screen_minutes.saturating_add(minutes);
    }

    pub fn take_break(&mut self, now: DateTime<Utc>) {
        self.last_break = Some(now);
    }

    /// Set semantics: an exercise already recorded stays a single entry.
    /// Returns whether the exercise was newly recorded.
    pub fn complete_exercise(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.exercises_completed.contains(&name) {
            return false;
        }
        self.exercises_completed.push(name);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_core::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn water_intake_accumulates_and_stamps() {
        let mut slice = WellnessSlice::new();
        let first = fixed_now();
        let second = first + Duration::minutes(40);

        slice.add_water(250, first);
        slice.add_water(250, second);

        assert_eq!(slice.water_intake_ml(), 500);
        assert_eq!(slice.last_water_intake(), Some(second));
    }

    #[test]
    fn movement_streak_counts_up() {
        let mut slice = WellnessSlice::new();
        slice.record_movement(fixed_now());
        slice.record_movement(fixed_now());
        assert_eq!(slice.movement_streak(), 2);
        assert_eq!(slice.last_movement(), Some(fixed_now()));
    }

    #[test]
    fn exercises_have_set_semantics() {
        let mut slice = WellnessSlice::new();
        assert!(slice.complete_exercise("neck roll"));
        assert!(!slice.complete_exercise("neck roll"));
        assert_eq!(slice.exercises_completed().len(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut slice = WellnessSlice::new();
        slice.add_water(500, fixed_now());
        slice.add_screen_minutes(30);
        slice.complete_exercise("ankle circles");

        slice.reset();
        assert_eq!(slice, WellnessSlice::new());
    }
}
