use tracing::info;

use cabin_core::Clock;
use cabin_core::model::SessionId;
use cabin_core::session::Subject;
use storage::AppState;

use crate::error::PomodoroError;
use crate::timer::{SessionOutcome, SessionTimer};

/// The break owed after a completed focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPlan {
    pub minutes: u32,
    /// True for the long break that follows every Nth focus session.
    pub long: bool,
    /// The automatically started break session.
    pub session_id: SessionId,
}

/// Pomodoro cadence over the single `Subject::Pomodoro` slot.
///
/// Focus and break periods are both ordinary timed sessions; whether the slot
/// currently holds a break is tracked by the productivity slice's `on_break`
/// flag.
#[derive(Debug, Clone, Copy)]
pub struct PomodoroService {
    timer: SessionTimer,
}

impl PomodoroService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            timer: SessionTimer::new(clock),
        }
    }

    /// Start a focus session using the configured focus duration.
    ///
    /// # Errors
    ///
    /// Returns `PomodoroError::OnBreak` while a break is running, or a timer
    /// error if the slot is otherwise occupied.
    pub fn start_focus(&self, state: &mut AppState) -> Result<SessionId, PomodoroError> {
        if state.productivity.on_break() {
            return Err(PomodoroError::OnBreak);
        }
        let minutes = state.productivity.prefs().focus_minutes;
        let id = self.timer.start(state, Subject::Pomodoro, minutes, None)?;
        Ok(id)
    }

    /// Complete the running focus session and start the break it earned.
    ///
    /// Every Nth completion (per the configured cadence) earns the long break.
    ///
    /// # Errors
    ///
    /// Returns `PomodoroError::NotRunning` if no focus session is live, or
    /// `PomodoroError::OnBreak` if the slot holds a break.
    pub fn complete_focus(&self, state: &mut AppState) -> Result<BreakPlan, PomodoroError> {
        if state.productivity.on_break() {
            return Err(PomodoroError::OnBreak);
        }
        let id = self.live_slot(state)?;
        self.timer.complete(state, id, SessionOutcome::FocusTime)?;

        let completed = state.productivity.record_focus_completion();
        let prefs = state.productivity.prefs();
        let long = completed % prefs.sessions_before_long_break == 0;
        let minutes = if long {
            prefs.long_break_minutes
        } else {
            prefs.break_minutes
        };

        let session_id = self.timer.start(state, Subject::Pomodoro, minutes, None)?;
        state.productivity.set_on_break(true);
        info!(completed, long, minutes, "focus session done, break started");
        Ok(BreakPlan {
            minutes,
            long,
            session_id,
        })
    }

    /// Complete the running break, freeing the slot for the next focus session.
    ///
    /// # Errors
    ///
    /// Returns `PomodoroError::NotOnBreak` if no break is in progress.
    pub fn complete_break(&self, state: &mut AppState) -> Result<(), PomodoroError> {
        let id = self.break_slot(state)?;
        self.timer.complete(state, id, SessionOutcome::Nothing)?;
        state.productivity.set_on_break(false);
        Ok(())
    }

    /// Cut the running break short. The break session is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `PomodoroError::NotOnBreak` if no break is in progress.
    pub fn skip_break(&self, state: &mut AppState) -> Result<(), PomodoroError> {
        let id = self.break_slot(state)?;
        self.timer.cancel(state, id)?;
        state.productivity.set_on_break(false);
        Ok(())
    }

    /// Cancel whatever occupies the slot, focus or break.
    ///
    /// # Errors
    ///
    /// Returns `PomodoroError::NotRunning` if the slot is empty.
    pub fn abandon(&self, state: &mut AppState) -> Result<(), PomodoroError> {
        let id = self.live_slot(state)?;
        self.timer.cancel(state, id)?;
        state.productivity.set_on_break(false);
        Ok(())
    }

    fn live_slot(&self, state: &AppState) -> Result<SessionId, PomodoroError> {
        state
            .sessions
            .live_for(Subject::Pomodoro)
            .map(|s| s.id())
            .ok_or(PomodoroError::NotRunning)
    }

    fn break_slot(&self, state: &AppState) -> Result<SessionId, PomodoroError> {
        if !state.productivity.on_break() {
            return Err(PomodoroError::NotOnBreak);
        }
        self.live_slot(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_core::time::fixed_clock;
    use chrono::Duration;

    fn at_minutes(minutes: i64) -> PomodoroService {
        PomodoroService::new(fixed_clock().advanced(Duration::minutes(minutes)))
    }

    /// Run one full focus-then-break cycle, returning the break plan.
    fn cycle(state: &mut AppState, start_minute: i64) -> BreakPlan {
        at_minutes(start_minute).start_focus(state).unwrap();
        let plan = at_minutes(start_minute + 25).complete_focus(state).unwrap();
        at_minutes(start_minute + 25 + i64::from(plan.minutes))
            .complete_break(state)
            .unwrap();
        plan
    }

    #[test]
    fn focus_completion_credits_minutes_and_starts_break() {
        let mut state = AppState::new();
        at_minutes(0).start_focus(&mut state).unwrap();
        let plan = at_minutes(25).complete_focus(&mut state).unwrap();

        assert!(!plan.long);
        assert_eq!(plan.minutes, 5);
        assert_eq!(state.productivity.total_focus_minutes(), 25);
        assert_eq!(state.productivity.focus_sessions_completed(), 1);
        assert!(state.productivity.on_break());
        assert!(state.sessions.live_for(Subject::Pomodoro).is_some());
    }

    #[test]
    fn fourth_completion_earns_the_long_break() {
        let mut state = AppState::new();
        let mut start = 0;
        for expected_long in [false, false, false, true] {
            let plan = cycle(&mut state, start);
            assert_eq!(plan.long, expected_long);
            start += 60;
        }
        assert_eq!(state.productivity.focus_sessions_completed(), 4);
    }

    #[test]
    fn cannot_start_focus_during_break() {
        let mut state = AppState::new();
        at_minutes(0).start_focus(&mut state).unwrap();
        at_minutes(25).complete_focus(&mut state).unwrap();

        let err = at_minutes(26).start_focus(&mut state).unwrap_err();
        assert_eq!(err, PomodoroError::OnBreak);
    }

    #[test]
    fn skip_break_frees_the_slot_without_folding() {
        let mut state = AppState::new();
        at_minutes(0).start_focus(&mut state).unwrap();
        at_minutes(25).complete_focus(&mut state).unwrap();
        at_minutes(27).skip_break(&mut state).unwrap();

        assert!(!state.productivity.on_break());
        // focus minutes only; the skipped break credits nothing
        assert_eq!(state.productivity.total_focus_minutes(), 25);
        at_minutes(27).start_focus(&mut state).unwrap();
    }

    #[test]
    fn break_operations_require_a_break() {
        let mut state = AppState::new();
        assert_eq!(
            at_minutes(0).complete_break(&mut state).unwrap_err(),
            PomodoroError::NotOnBreak
        );

        at_minutes(0).start_focus(&mut state).unwrap();
        assert_eq!(
            at_minutes(5).skip_break(&mut state).unwrap_err(),
            PomodoroError::NotOnBreak
        );
    }

    #[test]
    fn complete_focus_without_session_is_not_running() {
        let mut state = AppState::new();
        assert_eq!(
            at_minutes(0).complete_focus(&mut state).unwrap_err(),
            PomodoroError::NotRunning
        );
    }
}
