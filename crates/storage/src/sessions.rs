use cabin_core::model::SessionId;
use cabin_core::session::{BreakWatcher, Subject, TimedSession};

/// One live session entry plus its optional break-reminder cursor.
#[derive(Debug, Clone, PartialEq)]
struct ActiveEntry {
    session: TimedSession,
    watcher: Option<BreakWatcher>,
}

/// Owning collection for timed sessions across every subject kind.
///
/// Enforces the invariant that at most one session is live (`Running` or
/// `Paused`) per subject. Ended sessions move to `history`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSlice {
    active: Vec<ActiveEntry>,
    history: Vec<TimedSession>,
}

impl SessionSlice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The live session for a subject, if any.
    #[must_use]
    pub fn live_for(&self, subject: Subject) -> Option<&TimedSession> {
        self.active
            .iter()
            .map(|e| &e.session)
            .find(|s| s.subject() == subject && s.is_live())
    }

    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&TimedSession> {
        self.active
            .iter()
            .map(|e| &e.session)
            .find(|s| s.id() == id)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut TimedSession> {
        self.active
            .iter_mut()
            .map(|e| &mut e.session)
            .find(|s| s.id() == id)
    }

    #[must_use]
    pub fn active(&self) -> impl Iterator<Item = &TimedSession> {
        self.active.iter().map(|e| &e.session)
    }

    #[must_use]
    pub fn history(&self) -> &[TimedSession] {
        &self.history
    }

    /// Admit a session, refusing a second live session for the same subject.
    /// Returns whether the session was admitted.
    pub fn insert(&mut self, session: TimedSession, watcher: Option<BreakWatcher>) -> bool {
        if !session.is_live() || self.live_for(session.subject()).is_some() {
            return false;
        }
        self.active.push(ActiveEntry { session, watcher });
        true
    }

    /// Move an ended session from the active set into history.
    ///
    /// Returns `None` for unknown ids or sessions that are still live.
    pub fn archive(&mut self, id: SessionId) -> Option<TimedSession> {
        let index = self
            .active
            .iter()
            .position(|e| e.session.id() == id && !e.session.is_live())?;
        let entry = self.active.remove(index);
        self.history.push(entry.session.clone());
        Some(entry.session)
    }

    /// Pairs of live session and break watcher, for the periodic poll.
    pub fn watchers_mut(&mut self) -> impl Iterator<Item = (&TimedSession, &mut BreakWatcher)> {
        self.active
            .iter_mut()
            .filter_map(|e| match &mut e.watcher {
                Some(watcher) => Some((&e.session, watcher)),
                None => None,
            })
    }
}
