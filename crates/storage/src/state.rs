use crate::{
    EntertainmentSlice, FlightSlice, ProductivitySlice, ReadingSlice, SessionSlice, SettingsSlice,
    WellnessSlice,
};

/// The whole application state, one slice per domain.
///
/// Constructed explicitly and threaded through services by mutable reference.
/// All mutation is synchronous; concurrency lives outside this type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub flight: FlightSlice,
    pub wellness: WellnessSlice,
    pub entertainment: EntertainmentSlice,
    pub productivity: ProductivitySlice,
    pub reading: ReadingSlice,
    pub sessions: SessionSlice,
    pub settings: SettingsSlice,
}

impl AppState {
    /// Empty state with defaults everywhere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State preloaded with the launch catalogs (routes and library).
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            flight: FlightSlice::seeded(),
            reading: ReadingSlice::seeded(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_state_carries_catalogs() {
        let state = AppState::seeded();
        assert_eq!(state.flight.routes().len(), 4);
        assert_eq!(state.reading.books().len(), 2);
        assert!(state.sessions.history().is_empty());
    }

    #[test]
    fn new_state_is_empty() {
        let state = AppState::new();
        assert!(state.flight.routes().is_empty());
        assert!(state.reading.books().is_empty());
    }
}
