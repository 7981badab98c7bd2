use chrono::{DateTime, Utc};
use tracing::{debug, info};

use cabin_core::Clock;
use cabin_core::model::SessionId;
use cabin_core::session::{BreakWatcher, Subject, TimedSession};
use storage::AppState;

use crate::error::TimerError;

/// What the caller accomplished during a session, folded into the owning
/// slice at completion. Cancellation never folds anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Pages read during a book session.
    PagesRead(u32),
    /// The content item was watched to the end.
    Watched,
    /// Focus time to credit to the productivity totals.
    FocusTime,
    /// Nothing beyond the session record itself.
    Nothing,
}

/// A break reminder produced by a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakDue {
    pub session_id: SessionId,
    pub subject: Subject,
    /// Which interval boundary was crossed (1 for the first reminder).
    pub boundary: i64,
}

/// Drives timed sessions against the application state.
///
/// The service is stateless apart from its clock; all session records live in
/// `AppState`. Time spent is derived from timestamps, so calls may arrive at
/// any cadence.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimer {
    clock: Clock,
}

impl SessionTimer {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start a session, optionally with break reminders every
    /// `break_interval_minutes`.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::Conflict` if a session is already live for the
    /// subject, or a validation error from the session itself.
    pub fn start(
        &self,
        state: &mut AppState,
        subject: Subject,
        planned_minutes: u32,
        break_interval_minutes: Option<u32>,
    ) -> Result<SessionId, TimerError> {
        let session = TimedSession::begin(subject, planned_minutes, self.clock.now())?;
        let watcher = break_interval_minutes.map(BreakWatcher::new).transpose()?;
        let id = session.id();
        // the slice's admission check is the single source of truth for the
        // one-live-session-per-subject invariant
        if !state.sessions.insert(session, watcher) {
            return Err(TimerError::Conflict { subject });
        }
        info!(%id, %subject, planned_minutes, "session started");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `TimerError::UnknownSession` for ids not in the active set, or
    /// an invalid-transition error from the session.
    pub fn pause(&self, state: &mut AppState, id: SessionId) -> Result<(), TimerError> {
        self.session_mut(state, id)?.pause(self.clock.now())?;
        debug!(%id, "session paused");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `TimerError::UnknownSession` for ids not in the active set, or
    /// an invalid-transition error from the session.
    pub fn resume(&self, state: &mut AppState, id: SessionId) -> Result<(), TimerError> {
        self.session_mut(state, id)?.resume(self.clock.now())?;
        debug!(%id, "session resumed");
        Ok(())
    }

    /// Note that the user actually took a break.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::UnknownSession` for ids not in the active set, or
    /// an invalid-transition error from the session.
    pub fn record_break(&self, state: &mut AppState, id: SessionId) -> Result<(), TimerError> {
        self.session_mut(state, id)?.record_break(self.clock.now())
            .map_err(TimerError::from)
    }

    /// Note that the user got distracted mid-session.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::UnknownSession` for ids not in the active set, or
    /// an invalid-transition error from the session.
    pub fn record_distraction(&self, state: &mut AppState, id: SessionId) -> Result<(), TimerError> {
        self.session_mut(state, id)?.record_distraction(self.clock.now())
            .map_err(TimerError::from)
    }

    /// Complete a session and fold its outcome into the owning slice.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::UnknownSession` for ids not in the active set, or
    /// an invalid-transition error from the session.
    pub fn complete(
        &self,
        state: &mut AppState,
        id: SessionId,
        outcome: SessionOutcome,
    ) -> Result<TimedSession, TimerError> {
        let now = self.clock.now();
        self.session_mut(state, id)?.complete(now)?;
        let session = state
            .sessions
            .archive(id)
            .ok_or(TimerError::UnknownSession(id))?;
        fold_outcome(state, &session, outcome, now);
        info!(
            %id,
            subject = %session.subject(),
            elapsed_secs = session.elapsed_seconds(now),
            "session completed"
        );
        Ok(session)
    }

    /// Cancel a session. Nothing is folded; the record still lands in history.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::UnknownSession` for ids not in the active set, or
    /// an invalid-transition error from the session.
    pub fn cancel(&self, state: &mut AppState, id: SessionId) -> Result<TimedSession, TimerError> {
        self.session_mut(state, id)?.cancel(self.clock.now())?;
        let session = state
            .sessions
            .archive(id)
            .ok_or(TimerError::UnknownSession(id))?;
        info!(%id, subject = %session.subject(), "session cancelled");
        Ok(session)
    }

    /// Poll every watched session for a newly crossed break boundary.
    ///
    /// Each boundary fires exactly once regardless of the polling cadence.
    pub fn poll_breaks(&self, state: &mut AppState) -> Vec<BreakDue> {
        let now = self.clock.now();
        let mut due = Vec::new();
        for (session, watcher) in state.sessions.watchers_mut() {
            let elapsed = session.elapsed_seconds(now);
            if watcher.poll(elapsed) {
                due.push(BreakDue {
                    session_id: session.id(),
                    subject: session.subject(),
                    boundary: watcher.intervals_at(elapsed),
                });
            }
        }
        for reminder in &due {
            debug!(id = %reminder.session_id, boundary = reminder.boundary, "break due");
        }
        due
    }

    #[must_use]
    pub fn active_for<'a>(&self, state: &'a AppState, subject: Subject) -> Option<&'a TimedSession> {
        state.sessions.live_for(subject)
    }

    /// Seconds left of the planned duration, `None` for unknown ids.
    #[must_use]
    pub fn remaining_seconds(&self, state: &AppState, id: SessionId) -> Option<i64> {
        Some(state.sessions.session(id)?.remaining_seconds(self.clock.now()))
    }

    fn session_mut<'a>(
        &self,
        state: &'a mut AppState,
        id: SessionId,
    ) -> Result<&'a mut TimedSession, TimerError> {
        state
            .sessions
            .session_mut(id)
            .ok_or(TimerError::UnknownSession(id))
    }
}

/// Whole minutes of active time, for crediting totals.
fn elapsed_minutes(session: &TimedSession, now: DateTime<Utc>) -> u32 {
    u32::try_from(session.elapsed_seconds(now) / 60).unwrap_or(u32::MAX)
}

fn fold_outcome(
    state: &mut AppState,
    session: &TimedSession,
    outcome: SessionOutcome,
    now: DateTime<Utc>,
) {
    let minutes = elapsed_minutes(session, now);
    match session.subject() {
        Subject::Book(book_id) => {
            state.reading.add_reading_minutes(book_id, minutes);
            if let SessionOutcome::PagesRead(pages) = outcome {
                state.reading.advance_progress(book_id, pages, now);
            }
        }
        Subject::Content(content_id) => {
            state.entertainment.add_watch_minutes(minutes);
            if outcome == SessionOutcome::Watched {
                state.entertainment.mark_completed(content_id);
            }
        }
        Subject::Pomodoro | Subject::Focus => {
            if outcome == SessionOutcome::FocusTime {
                state.productivity.add_focus_minutes(minutes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_core::model::BookId;
    use cabin_core::session::SessionState;
    use cabin_core::time::fixed_clock;
    use chrono::Duration;

    fn seeded() -> AppState {
        AppState::seeded()
    }

    fn first_book(state: &AppState) -> BookId {
        state.reading.books()[0].id()
    }

    #[test]
    fn start_rejects_second_session_for_subject() {
        let mut state = seeded();
        let timer = SessionTimer::new(fixed_clock());
        let book = first_book(&state);

        timer.start(&mut state, Subject::Book(book), 30, None).unwrap();
        let err = timer
            .start(&mut state, Subject::Book(book), 30, None)
            .unwrap_err();
        assert_eq!(
            err,
            TimerError::Conflict {
                subject: Subject::Book(book)
            }
        );
    }

    #[test]
    fn complete_folds_reading_outcome() {
        let mut state = seeded();
        let book = first_book(&state);
        let timer = SessionTimer::new(fixed_clock());
        let id = timer.start(&mut state, Subject::Book(book), 30, None).unwrap();

        let later = SessionTimer::new(fixed_clock().advanced(Duration::minutes(30)));
        later
            .complete(&mut state, id, SessionOutcome::PagesRead(24))
            .unwrap();

        let book = state.reading.book(book).unwrap();
        assert_eq!(book.reading_minutes(), 30);
        assert_eq!(book.current_page(), 24);
        assert_eq!(state.sessions.history().len(), 1);
    }

    #[test]
    fn cancel_folds_nothing() {
        let mut state = seeded();
        let book = first_book(&state);
        let timer = SessionTimer::new(fixed_clock());
        let id = timer.start(&mut state, Subject::Book(book), 30, None).unwrap();

        let later = SessionTimer::new(fixed_clock().advanced(Duration::minutes(20)));
        let session = later.cancel(&mut state, id).unwrap();
        assert_eq!(session.state(), SessionState::Cancelled);

        let book = state.reading.book(book).unwrap();
        assert_eq!(book.reading_minutes(), 0);
        assert_eq!(book.current_page(), 0);
        assert_eq!(state.sessions.history().len(), 1);
    }

    #[test]
    fn unknown_session_is_an_error() {
        let mut state = seeded();
        let timer = SessionTimer::new(fixed_clock());
        let ghost = SessionId::new();
        assert_eq!(
            timer.pause(&mut state, ghost).unwrap_err(),
            TimerError::UnknownSession(ghost)
        );
    }

    #[test]
    fn poll_breaks_fires_once_per_boundary() {
        let mut state = seeded();
        let book = first_book(&state);
        let timer = SessionTimer::new(fixed_clock());
        let id = timer
            .start(&mut state, Subject::Book(book), 60, Some(25))
            .unwrap();

        let mut at = |secs: i64| {
            SessionTimer::new(fixed_clock().advanced(Duration::seconds(secs)))
                .poll_breaks(&mut state)
        };

        assert!(at(1499).is_empty());
        let due = at(1500);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].session_id, id);
        assert_eq!(due[0].boundary, 1);
        assert!(at(1501).is_empty());

        let second = at(3000);
        assert_eq!(second[0].boundary, 2);
    }

    #[test]
    fn paused_session_defers_break_boundaries() {
        let mut state = seeded();
        let book = first_book(&state);
        let timer = SessionTimer::new(fixed_clock());
        let id = timer
            .start(&mut state, Subject::Book(book), 60, Some(25))
            .unwrap();

        // pause at 20 minutes of elapsed time
        SessionTimer::new(fixed_clock().advanced(Duration::seconds(1200)))
            .pause(&mut state, id)
            .unwrap();

        // wall clock passes the boundary but elapsed time is frozen
        let due = SessionTimer::new(fixed_clock().advanced(Duration::seconds(1600)))
            .poll_breaks(&mut state);
        assert!(due.is_empty());
    }

    #[test]
    fn distractions_accumulate_on_the_live_session() {
        let mut state = seeded();
        let timer = SessionTimer::new(fixed_clock());
        let id = timer.start(&mut state, Subject::Focus, 25, None).unwrap();

        let later = SessionTimer::new(fixed_clock().advanced(Duration::minutes(5)));
        later.record_distraction(&mut state, id).unwrap();
        later.record_distraction(&mut state, id).unwrap();
        assert_eq!(state.sessions.session(id).unwrap().distractions(), 2);

        later.complete(&mut state, id, SessionOutcome::FocusTime).unwrap();
        assert_eq!(state.sessions.history()[0].distractions(), 2);
        assert!(matches!(
            later.record_distraction(&mut state, id),
            Err(TimerError::UnknownSession(_))
        ));
    }

    #[test]
    fn remaining_counts_down() {
        let mut state = seeded();
        let book = first_book(&state);
        let timer = SessionTimer::new(fixed_clock());
        let id = timer.start(&mut state, Subject::Book(book), 30, None).unwrap();

        let later = SessionTimer::new(fixed_clock().advanced(Duration::seconds(600)));
        assert_eq!(later.remaining_seconds(&state, id), Some(1200));
        assert_eq!(later.remaining_seconds(&state, SessionId::new()), None);
    }
}
