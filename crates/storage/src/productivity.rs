use chrono::{DateTime, Utc};
use thiserror::Error;

use cabin_core::model::{
    BlockCategory, Goal, GoalError, GoalId, GoalKind, TimeBlock, TimeBlockError, TimeBlockId,
    TimeBlockUpdate,
};

use crate::seq::IdSeq;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PrefsError {
    #[error("pomodoro durations must be at least one minute")]
    InvalidDuration,

    #[error("sessions before a long break must be at least one")]
    InvalidCadence,
}

/// Pomodoro cadence preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomodoroPrefs {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_before_long_break: u32,
}

impl Default for PomodoroPrefs {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            sessions_before_long_break: 4,
        }
    }
}

/// Partial update to the pomodoro preferences; absent fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PomodoroPrefsUpdate {
    pub focus_minutes: Option<u32>,
    pub break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    pub sessions_before_long_break: Option<u32>,
}

/// Fields the caller supplies when scheduling a time block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeBlock {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub category: BlockCategory,
}

/// Pomodoro bookkeeping, time blocks and productivity goals.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductivitySlice {
    prefs: PomodoroPrefs,
    focus_sessions_completed: u32,
    on_break: bool,
    total_focus_minutes: u32,
    time_blocks: Vec<TimeBlock>,
    goals: Vec<Goal>,
    block_ids: IdSeq,
    goal_ids: IdSeq,
}

impl ProductivitySlice {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefs: PomodoroPrefs::default(),
            focus_sessions_completed: 0,
            on_break: false,
            total_focus_minutes: 0,
            time_blocks: Vec::new(),
            goals: Vec::new(),
            block_ids: IdSeq::starting_at(1),
            goal_ids: IdSeq::starting_at(1),
        }
    }

    // Reads

    #[must_use]
    pub fn prefs(&self) -> PomodoroPrefs {
        self.prefs
    }

    #[must_use]
    pub fn focus_sessions_completed(&self) -> u32 {
        self.focus_sessions_completed
    }

    #[must_use]
    pub fn on_break(&self) -> bool {
        self.on_break
    }

    #[must_use]
    pub fn total_focus_minutes(&self) -> u32 {
        self.total_focus_minutes
    }

    #[must_use]
    pub fn time_blocks(&self) -> &[TimeBlock] {
        &self.time_blocks
    }

    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    #[must_use]
    pub fn time_block(&self, id: TimeBlockId) -> Option<&TimeBlock> {
        self.time_blocks.iter().find(|b| b.id() == id)
    }

    #[must_use]
    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id() == id)
    }

    // Pomodoro

    /// # Errors
    ///
    /// Returns `PrefsError` if a provided value is zero; nothing is mutated.
    pub fn update_prefs(&mut self, update: PomodoroPrefsUpdate) -> Result<(), PrefsError> {
        let durations = [
            update.focus_minutes,
            update.break_minutes,
            update.long_break_minutes,
        ];
        if durations.iter().any(|d| *d == Some(0)) {
            return Err(PrefsError::InvalidDuration);
        }
        if update.sessions_before_long_break == Some(0) {
            return Err(PrefsError::InvalidCadence);
        }

        if let Some(minutes) = update.focus_minutes {
            self.prefs.focus_minutes = minutes;
        }
        if let Some(minutes) = update.break_minutes {
            self.prefs.break_minutes = minutes;
        }
        if let Some(minutes) = update.long_break_minutes {
            self.prefs.long_break_minutes = minutes;
        }
        if let Some(cadence) = update.sessions_before_long_break {
            self.prefs.sessions_before_long_break = cadence;
        }
        Ok(())
    }

    /// Count a finished focus session; returns the new completion count.
    pub fn record_focus_completion(&mut self) -> u32 {
        self.focus_sessions_completed = self.focus_sessions_completed.saturating_add(1);
        self.focus_sessions_completed
    }

    pub fn set_on_break(&mut self, on_break: bool) {
        self.on_break = on_break;
    }

    pub fn add_focus_minutes(&mut self, minutes: u32) {
        self.total_focus_minutes = self.total_focus_minutes.saturating_add(minutes);
    }

    // Time blocks

    /// # Errors
    ///
    /// Returns `TimeBlockError` if the supplied fields fail validation.
    pub fn add_time_block(&mut self, new: NewTimeBlock) -> Result<TimeBlockId, TimeBlockError> {
        let id = TimeBlockId::new(self.block_ids.next());
        let block = TimeBlock::new(id, new.title, new.start_time, new.duration_minutes, new.category)?;
        self.time_blocks.push(block);
        Ok(id)
    }

    /// Apply a partial update; unknown ids are a lenient no-op (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// Returns `TimeBlockError` if the update fails validation.
    pub fn update_time_block(
        &mut self,
        id: TimeBlockId,
        update: TimeBlockUpdate,
    ) -> Result<bool, TimeBlockError> {
        match self.time_blocks.iter_mut().find(|b| b.id() == id) {
            Some(block) => {
                block.apply(update)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flip a block's completed flag; unknown ids are a no-op returning `false`.
    pub fn toggle_block_completion(&mut self, id: TimeBlockId) -> bool {
        match self.time_blocks.iter_mut().find(|b| b.id() == id) {
            Some(block) => {
                let update = TimeBlockUpdate {
                    completed: Some(!block.completed()),
                    ..TimeBlockUpdate::default()
                };
                block.apply(update).is_ok()
            }
            None => false,
        }
    }

    pub fn remove_time_block(&mut self, id: TimeBlockId) -> bool {
        let before = self.time_blocks.len();
        self.time_blocks.retain(|b| b.id() != id);
        self.time_blocks.len() != before
    }

    // Goals

    /// # Errors
    ///
    /// Returns `GoalError::InvalidTarget` for a zero target.
    pub fn add_goal(
        &mut self,
        title: Option<String>,
        kind: GoalKind,
        target: u32,
        deadline: DateTime<Utc>,
        unit: impl Into<String>,
    ) -> Result<GoalId, GoalError> {
        let id = GoalId::new(self.goal_ids.next());
        let goal = Goal::new(id, title, kind, target, deadline, unit)?;
        self.goals.push(goal);
        Ok(id)
    }

    pub fn update_goal_progress(&mut self, id: GoalId, value: u32) -> bool {
        match self.goals.iter_mut().find(|g| g.id() == id) {
            Some(goal) => {
                goal.set_current(value);
                true
            }
            None => false,
        }
    }

    pub fn remove_goal(&mut self, id: GoalId) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id() != id);
        self.goals.len() != before
    }

    /// Clear blocks and goals, keeping preferences and lifetime totals.
    pub fn reset_plans(&mut self) {
        self.time_blocks.clear();
        self.goals.clear();
    }
}

impl Default for ProductivitySlice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_core::time::fixed_now;

    #[test]
    fn default_prefs_match_pomodoro_convention() {
        let prefs = ProductivitySlice::new().prefs();
        assert_eq!(prefs.focus_minutes, 25);
        assert_eq!(prefs.break_minutes, 5);
        assert_eq!(prefs.long_break_minutes, 15);
        assert_eq!(prefs.sessions_before_long_break, 4);
    }

    #[test]
    fn prefs_update_rejects_zero_without_mutating() {
        let mut slice = ProductivitySlice::new();
        let err = slice
            .update_prefs(PomodoroPrefsUpdate {
                focus_minutes: Some(0),
                break_minutes: Some(10),
                ..PomodoroPrefsUpdate::default()
            })
            .unwrap_err();
        assert_eq!(err, PrefsError::InvalidDuration);
        assert_eq!(slice.prefs().break_minutes, 5);
    }

    #[test]
    fn prefs_partial_update_applies() {
        let mut slice = ProductivitySlice::new();
        slice
            .update_prefs(PomodoroPrefsUpdate {
                focus_minutes: Some(50),
                ..PomodoroPrefsUpdate::default()
            })
            .unwrap();
        assert_eq!(slice.prefs().focus_minutes, 50);
        assert_eq!(slice.prefs().break_minutes, 5);
    }

    #[test]
    fn time_block_requires_title() {
        let mut slice = ProductivitySlice::new();
        let err = slice
            .add_time_block(NewTimeBlock {
                title: "  ".to_owned(),
                start_time: fixed_now(),
                duration_minutes: 30,
                category: BlockCategory::Work,
            })
            .unwrap_err();
        assert_eq!(err, TimeBlockError::MissingTitle);
    }

    #[test]
    fn update_unknown_block_is_lenient() {
        let mut slice = ProductivitySlice::new();
        let applied = slice
            .update_time_block(TimeBlockId::new(7), TimeBlockUpdate::default())
            .unwrap();
        assert!(!applied);
    }

    #[test]
    fn toggle_flips_block_completion() {
        let mut slice = ProductivitySlice::new();
        let id = slice
            .add_time_block(NewTimeBlock {
                title: "Watch a film".to_owned(),
                start_time: fixed_now(),
                duration_minutes: 95,
                category: BlockCategory::Entertainment,
            })
            .unwrap();

        assert!(slice.toggle_block_completion(id));
        assert!(slice.time_block(id).unwrap().completed());
        assert!(slice.toggle_block_completion(id));
        assert!(!slice.time_block(id).unwrap().completed());
        assert!(!slice.toggle_block_completion(TimeBlockId::new(99)));
    }

    #[test]
    fn focus_completions_count_up() {
        let mut slice = ProductivitySlice::new();
        assert_eq!(slice.record_focus_completion(), 1);
        assert_eq!(slice.record_focus_completion(), 2);
        slice.add_focus_minutes(25);
        assert_eq!(slice.total_focus_minutes(), 25);
    }

    #[test]
    fn reset_plans_keeps_totals() {
        let mut slice = ProductivitySlice::new();
        slice
            .add_time_block(NewTimeBlock {
                title: "Stretch".to_owned(),
                start_time: fixed_now(),
                duration_minutes: 10,
                category: BlockCategory::Wellness,
            })
            .unwrap();
        slice.add_focus_minutes(40);

        slice.reset_plans();
        assert!(slice.time_blocks().is_empty());
        assert_eq!(slice.total_focus_minutes(), 40);
    }
}
