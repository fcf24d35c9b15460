use std::time::Duration;

/// What to do when weather fetches resolve out of order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeatherOrdering {
    /// Whatever resolves last is shown, even if it was requested first
    #[default]
    LastResolved,
    /// Drop a result if a result from a newer request has already been applied
    LatestRequest,
}

/// Tunables for [crate::Controller]
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Latitude and longitude delta of the region the camera moves to on "find my location"
    pub camera_delta: f64,
    /// How long the camera animation runs
    pub camera_animation: Duration,
    /// Zoom level used for external map links
    pub external_map_zoom: u8,
    pub weather_ordering: WeatherOrdering,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            camera_delta: 0.05,
            camera_animation: Duration::from_millis(1000),
            external_map_zoom: 15,
            weather_ordering: WeatherOrdering::default(),
        }
    }
}
