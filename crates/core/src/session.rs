use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{BookId, ContentId, SessionId};

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// The entity a timed session is acting upon.
///
/// At most one session may be live (`Running` or `Paused`) per subject; the
/// owning collection enforces that, not the session itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// A reading session against a library book.
    Book(BookId),
    /// A watch session against a watchlist item.
    Content(ContentId),
    /// The single pomodoro slot (focus or break).
    Pomodoro,
    /// A free-standing focus session not tied to an entity.
    Focus,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Book(id) => write!(f, "book {id}"),
            Subject::Content(id) => write!(f, "content {id}"),
            Subject::Pomodoro => write!(f, "pomodoro"),
            Subject::Focus => write!(f, "focus"),
        }
    }
}

//
// ─── STATES & MARKS ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Running,
    Paused,
    Completed,
    Cancelled,
}

impl SessionState {
    /// A live session can still be paused, resumed, completed or cancelled.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, SessionState::Running | SessionState::Paused)
    }

    /// Terminal states permit no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_live()
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkKind {
    Pause,
    Resume,
    Break,
    Distraction,
}

/// A progress mark: a timestamped event recorded while the session was live.
///
/// Marks are append-only and non-decreasing in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMark {
    pub kind: MarkKind,
    pub at: DateTime<Utc>,
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("planned duration must be at least one minute")]
    InvalidDuration,

    #[error("break interval must be at least one minute")]
    InvalidBreakInterval,

    #[error("cannot {action} a {state} session")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },
}

//
// ─── TIMED SESSION ─────────────────────────────────────────────────────────────
//

/// A timed activity with start, pause/resume, completion and cancellation.
///
/// Elapsed and remaining time are derived from timestamps at read time; nothing
/// here accumulates counters on a tick. The state machine:
///
/// `begin → Running ⇄ Paused`, and both live states may transition to
/// `Completed` or `Cancelled` (terminal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedSession {
    id: SessionId,
    subject: Subject,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    planned_minutes: u32,
    state: SessionState,
    marks: Vec<SessionMark>,
}

impl TimedSession {
    /// Start a new session in the `Running` state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidDuration` if `planned_minutes` is zero.
    pub fn begin(
        subject: Subject,
        planned_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if planned_minutes == 0 {
            return Err(SessionError::InvalidDuration);
        }

        Ok(Self {
            id: SessionId::new(),
            subject,
            started_at: now,
            ended_at: None,
            planned_minutes,
            state: SessionState::Running,
            marks: Vec::new(),
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Set exactly once, at completion or cancellation.
    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    #[must_use]
    pub fn planned_minutes(&self) -> u32 {
        self.planned_minutes
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn marks(&self) -> &[SessionMark] {
        &self.marks
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    #[must_use]
    pub fn breaks_taken(&self) -> usize {
        self.marks
            .iter()
            .filter(|m| m.kind == MarkKind::Break)
            .count()
    }

    #[must_use]
    pub fn distractions(&self) -> usize {
        self.marks
            .iter()
            .filter(|m| m.kind == MarkKind::Distraction)
            .count()
    }

    // Transitions

    /// Pause a running session, recording a pause mark.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is `Running`.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "pause",
            });
        }
        self.push_mark(MarkKind::Pause, now);
        self.state = SessionState::Paused;
        Ok(())
    }

    /// Resume a paused session, recording a resume mark.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is `Paused`.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.state != SessionState::Paused {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "resume",
            });
        }
        self.push_mark(MarkKind::Resume, now);
        self.state = SessionState::Running;
        Ok(())
    }

    /// Complete a live session, stamping `ended_at`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session already ended.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.end("complete", SessionState::Completed, now)
    }

    /// Cancel a live session, stamping `ended_at`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` if the session already ended.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.end("cancel", SessionState::Cancelled, now)
    }

    /// Record that a break was taken.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is live.
    pub fn record_break(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if !self.is_live() {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "record a break on",
            });
        }
        self.push_mark(MarkKind::Break, now);
        Ok(())
    }

    /// Record that the user got distracted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is live.
    pub fn record_distraction(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if !self.is_live() {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: "record a distraction on",
            });
        }
        self.push_mark(MarkKind::Distraction, now);
        Ok(())
    }

    fn end(
        &mut self,
        action: &'static str,
        terminal: SessionState,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if !self.is_live() {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action,
            });
        }
        self.state = terminal;
        self.ended_at = Some(now.max(self.mark_floor()));
        Ok(())
    }

    fn push_mark(&mut self, kind: MarkKind, at: DateTime<Utc>) {
        let floor = self.mark_floor();
        self.marks.push(SessionMark {
            kind,
            at: at.max(floor),
        });
    }

    /// Earliest timestamp a new mark or the end stamp may carry, keeping the
    /// whole timeline non-decreasing even if the clock reads slightly backwards.
    fn mark_floor(&self) -> DateTime<Utc> {
        self.marks
            .last()
            .map_or(self.started_at, |mark| mark.at.max(self.started_at))
    }

    // Derived time

    /// Seconds of active (non-paused) time between start and `now` (or the end
    /// of the session, whichever came first). Never negative, never panics.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        let until = match self.ended_at {
            Some(ended) => ended,
            None => now.max(self.started_at),
        };
        let span = (until - self.started_at).num_seconds().max(0);
        (span - self.paused_seconds(until)).max(0)
    }

    /// Seconds left of the planned duration, floored at zero.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let planned = i64::from(self.planned_minutes) * 60;
        (planned - self.elapsed_seconds(now)).max(0)
    }

    /// Total paused time up to `until`, derived from consecutive pause/resume
    /// marks. A pause with no matching resume is open until `until`.
    fn paused_seconds(&self, until: DateTime<Utc>) -> i64 {
        let mut total = 0;
        let mut pause_start: Option<DateTime<Utc>> = None;
        for mark in &self.marks {
            match mark.kind {
                MarkKind::Pause => {
                    if pause_start.is_none() {
                        pause_start = Some(mark.at);
                    }
                }
                MarkKind::Resume => {
                    if let Some(start) = pause_start.take() {
                        total += (mark.at - start).num_seconds().max(0);
                    }
                }
                MarkKind::Break | MarkKind::Distraction => {}
            }
        }
        if let Some(start) = pause_start {
            total += (until - start).num_seconds().max(0);
        }
        total
    }
}

//
// ─── BREAK WATCHER ─────────────────────────────────────────────────────────────
//

/// Detects break-interval boundary crossings between consecutive polls.
///
/// A break is due when `floor(elapsed / interval)` exceeds the same value at the
/// previous poll, so a caller polling every second fires each reminder exactly
/// once no matter the cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakWatcher {
    interval_secs: i64,
    previous_elapsed: i64,
}

impl BreakWatcher {
    /// # Errors
    ///
    /// Returns `SessionError::InvalidBreakInterval` if `interval_minutes` is zero.
    pub fn new(interval_minutes: u32) -> Result<Self, SessionError> {
        if interval_minutes == 0 {
            return Err(SessionError::InvalidBreakInterval);
        }
        Ok(Self {
            interval_secs: i64::from(interval_minutes) * 60,
            previous_elapsed: 0,
        })
    }

    #[must_use]
    pub fn interval_secs(&self) -> i64 {
        self.interval_secs
    }

    /// Check whether a break became due since the previous poll.
    ///
    /// Records `elapsed_secs` as the new cursor; elapsed time never decreases
    /// for a session, so a stale reading is clamped rather than rewinding.
    pub fn poll(&mut self, elapsed_secs: i64) -> bool {
        let previous = self.previous_elapsed;
        self.previous_elapsed = elapsed_secs.max(previous);
        (elapsed_secs / self.interval_secs) > (previous / self.interval_secs)
    }

    /// Number of full intervals elapsed at the given reading.
    #[must_use]
    pub fn intervals_at(&self, elapsed_secs: i64) -> i64 {
        elapsed_secs.max(0) / self.interval_secs
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
