use chrono::{DateTime, Duration, Utc};

/// Clock abstraction so services and tests can control time explicitly.
///
/// Every time-touching operation in the workspace takes its timestamps from a
/// `Clock` rather than calling `Utc::now()` directly.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    /// Real wall-clock time.
    #[default]
    System,
    /// Frozen at a specific instant; advanced manually.
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock backed by the system wall clock.
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    /// Returns a clock frozen at the given instant.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Current time according to this clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }

    /// Advance a fixed clock by `delta`. No effect on `Clock::System`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(at) = self {
            *at += delta;
        }
    }

    /// Returns a copy of this clock advanced by `delta`.
    #[must_use]
    pub fn advanced(mut self, delta: Duration) -> Self {
        self.advance(delta);
        self
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Deterministic timestamp for tests (2024-06-01T08:00:00Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_717_228_800;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` frozen at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
