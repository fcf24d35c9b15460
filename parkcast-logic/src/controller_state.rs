use serde::{Deserialize, Serialize};

use crate::{
    UtcDT, location::Coordinates, settings::WeatherOrdering, weather::WeatherSnapshot,
};

/// Sequence number handed to each weather request, in the order they were issued
pub type WeatherRequestId = u64;

/// Mutable state owned by [crate::Controller]
#[derive(Debug, Default)]
pub struct ControllerState {
    current_location: Option<Coordinates>,
    last_weather: Option<WeatherSnapshot>,
    weather_fetched_at: Option<UtcDT>,
    next_weather_request: WeatherRequestId,
    applied_weather_request: Option<WeatherRequestId>,
}

/// Read-only copy of the controller's state, handed to the UI
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, specta::Type)]
pub struct ControllerUiState {
    /// The user's last known position, `None` until permission is granted and a fix arrives
    pub current_location: Option<Coordinates>,
    /// Latest weather shown in callouts, not tied to any particular point
    pub last_weather: Option<WeatherSnapshot>,
    /// When [ControllerUiState::last_weather] was applied
    pub weather_fetched_at: Option<UtcDT>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_location(&mut self, coordinates: Coordinates) {
        self.current_location = Some(coordinates);
    }

    /// Reserve the id for a weather request that's about to go out
    pub fn next_weather_request(&mut self) -> WeatherRequestId {
        let id = self.next_weather_request;
        self.next_weather_request += 1;
        id
    }

    /// Replace the held snapshot with the result of request `id`.
    /// Returns `false` if `ordering` says the result is stale and it was dropped.
    pub fn apply_weather(
        &mut self,
        id: WeatherRequestId,
        snapshot: WeatherSnapshot,
        ordering: WeatherOrdering,
        now: UtcDT,
    ) -> bool {
        if ordering == WeatherOrdering::LatestRequest
            && self
                .applied_weather_request
                .is_some_and(|applied| applied > id)
        {
            return false;
        }

        self.applied_weather_request = Some(id);
        self.last_weather = Some(snapshot);
        self.weather_fetched_at = Some(now);
        true
    }

    pub fn as_ui_state(&self) -> ControllerUiState {
        ControllerUiState {
            current_location: self.current_location,
            last_weather: self.last_weather.clone(),
            weather_fetched_at: self.weather_fetched_at,
        }
    }
}
