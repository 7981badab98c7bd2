use chrono::{DateTime, Duration, Utc};

use cabin_core::model::{FlightPhase, FlightRoute};

/// Route catalog and the tracked flight's phase and timings.
///
/// Taking off stamps the start time and expected end; completing stamps the
/// actual end. Progress through the flight is derived at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSlice {
    routes: Vec<FlightRoute>,
    selected: Option<String>,
    duration_minutes: u32,
    phase: FlightPhase,
    started_at: Option<DateTime<Utc>>,
    expected_end: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    origin_tz: String,
    destination_tz: String,
}

impl FlightSlice {
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            selected: None,
            duration_minutes: 0,
            phase: FlightPhase::NotStarted,
            started_at: None,
            expected_end: None,
            ended_at: None,
            origin_tz: "UTC".to_owned(),
            destination_tz: "UTC".to_owned(),
        }
    }

    /// The launch catalog of routes out of Entebbe.
    #[must_use]
    pub fn seeded() -> Self {
        let mut slice = Self::new();
        slice.routes = vec![
            FlightRoute::new(
                "entebbe-nairobi",
                "Entebbe to Nairobi",
                "Entebbe International Airport",
                "Jomo Kenyatta International Airport",
                60,
            )
            .with_description("Short regional flight with beautiful views of Lake Victoria"),
            FlightRoute::new(
                "entebbe-dubai",
                "Entebbe to Dubai",
                "Entebbe International Airport",
                "Dubai International Airport",
                300,
            )
            .with_description("Medium-haul flight over diverse landscapes"),
            FlightRoute::new(
                "entebbe-london",
                "Entebbe to London",
                "Entebbe International Airport",
                "London Heathrow Airport",
                480,
            )
            .with_description("Long-haul flight crossing multiple time zones"),
            FlightRoute::new(
                "entebbe-johannesburg",
                "Entebbe to Johannesburg",
                "Entebbe International Airport",
                "O.R. Tambo International Airport",
                240,
            )
            .with_description("Scenic flight over East and Southern Africa"),
        ];
        slice
    }

    // Reads

    #[must_use]
    pub fn routes(&self) -> &[FlightRoute] {
        &self.routes
    }

    #[must_use]
    pub fn route(&self, id: &str) -> Option<&FlightRoute> {
        self.routes.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn selected_route(&self) -> Option<&FlightRoute> {
        let id = self.selected.as_deref()?;
        self.route(id)
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn expected_end(&self) -> Option<DateTime<Utc>> {
        self.expected_end
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    #[must_use]
    pub fn timezones(&self) -> (&str, &str) {
        (&self.origin_tz, &self.destination_tz)
    }

    /// Fraction of the flight elapsed, derived from the takeoff stamp and the
    /// planned duration, clamped to `[0, 1]`. Zero before takeoff.
    #[must_use]
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let (Some(started), duration) = (self.started_at, self.duration_minutes) else {
            return 0.0;
        };
        if duration == 0 {
            return 0.0;
        }
        let elapsed = (now - started).num_seconds().max(0) as f64;
        let total = f64::from(duration) * 60.0;
        (elapsed / total).clamp(0.0, 1.0)
    }

    // Mutations

    /// Select a catalog route, adopting its duration. Unknown route ids are a
    /// no-op returning `false`.
    pub fn select_route(&mut self, id: &str) -> bool {
        let Some(route) = self.route(id) else {
            return false;
        };
        let (duration_minutes, route_id) = (route.duration_minutes, route.id.clone());
        self.duration_minutes = duration_minutes;
        self.selected = Some(route_id);
        true
    }

    pub fn set_duration(&mut self, minutes: u32) {
        self.duration_minutes = minutes;
    }

    pub fn set_timezones(&mut self, origin: impl Into<String>, destination: impl Into<String>) {
        self.origin_tz = origin.into();
        self.destination_tz = destination.into();
    }

    /// Move the flight to `phase`, stamping timings on takeoff and completion.
    pub fn set_phase(&mut self, phase: FlightPhase, now: DateTime<Utc>) {
        self.phase = phase;
        match phase {
            FlightPhase::Takeoff => {
                self.started_at = Some(now);
                self.expected_end =
                    Some(now + Duration::minutes(i64::from(self.duration_minutes)));
            }
            FlightPhase::Completed => {
                self.ended_at = Some(now);
            }
            FlightPhase::NotStarted | FlightPhase::Cruise | FlightPhase::Landing => {}
        }
    }

    /// Back to the not-started state, keeping the route catalog.
    pub fn reset(&mut self) {
        let routes = std::mem::take(&mut self.routes);
        *self = Self::new();
        self.routes = routes;
    }
}

impl Default for FlightSlice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabin_core::time::fixed_now;

    #[test]
    fn seeded_catalog_has_four_routes() {
        let slice = FlightSlice::seeded();
        assert_eq!(slice.routes().len(), 4);
        assert!(slice.route("entebbe-london").is_some());
    }

    #[test]
    fn select_route_adopts_duration() {
        let mut slice = FlightSlice::seeded();
        assert!(slice.select_route("entebbe-dubai"));
        assert_eq!(slice.duration_minutes(), 300);
        assert_eq!(slice.selected_route().unwrap().id, "entebbe-dubai");

        assert!(!slice.select_route("entebbe-atlantis"));
        assert_eq!(slice.duration_minutes(), 300);
    }

    #[test]
    fn takeoff_stamps_start_and_expected_end() {
        let mut slice = FlightSlice::seeded();
        slice.select_route("entebbe-nairobi");
        slice.set_phase(FlightPhase::Takeoff, fixed_now());

        assert_eq!(slice.started_at(), Some(fixed_now()));
        assert_eq!(slice.expected_end(), Some(fixed_now() + Duration::minutes(60)));
        assert_eq!(slice.ended_at(), None);
    }

    #[test]
    fn completion_stamps_end() {
        let mut slice = FlightSlice::seeded();
        slice.select_route("entebbe-nairobi");
        slice.set_phase(FlightPhase::Takeoff, fixed_now());
        let landed = fixed_now() + Duration::minutes(62);
        slice.set_phase(FlightPhase::Completed, landed);
        assert_eq!(slice.ended_at(), Some(landed));
    }

    #[test]
    fn progress_is_derived_and_clamped() {
        let mut slice = FlightSlice::seeded();
        assert_eq!(slice.progress(fixed_now()), 0.0);

        slice.select_route("entebbe-nairobi");
        slice.set_phase(FlightPhase::Takeoff, fixed_now());

        let halfway = fixed_now() + Duration::minutes(30);
        assert!((slice.progress(halfway) - 0.5).abs() < 1e-9);

        let long_after = fixed_now() + Duration::minutes(600);
        assert!((slice.progress(long_after) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_keeps_routes() {
        let mut slice = FlightSlice::seeded();
        slice.select_route("entebbe-london");
        slice.set_phase(FlightPhase::Takeoff, fixed_now());

        slice.reset();
        assert_eq!(slice.phase(), FlightPhase::NotStarted);
        assert_eq!(slice.routes().len(), 4);
        assert!(slice.selected_route().is_none());
    }
}
