use serde::{Deserialize, Serialize};

use crate::location::Coordinates;

/// Current conditions at some coordinates, as last reported by the weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, specta::Type)]
pub struct WeatherSnapshot {
    pub temperature_celsius: f64,
    /// Description of the first condition the provider listed, e.g. "clear sky"
    pub description: String,
}

impl WeatherSnapshot {
    /// One-line summary shown in a marker's callout
    pub fn summary(&self) -> String {
        format!("{}°C | {}", self.temperature_celsius, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeatherError {
    /// Connection failure, timeout, or a non-2xx status from the provider
    #[error("Error fetching weather data: {}", status_or_message(.status, .message))]
    Network {
        status: Option<u16>,
        message: String,
    },
    /// The provider answered, but not with something we understand
    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

fn status_or_message(status: &Option<u16>, message: &str) -> String {
    status.map_or_else(|| message.to_string(), |s| s.to_string())
}

impl WeatherError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            Self::MalformedResponse(_) => None,
        }
    }
}

pub trait WeatherService: Send + Sync {
    /// Fetch current conditions for the given coordinates, a single request with no retries
    fn current_weather(
        &self,
        coordinates: Coordinates,
    ) -> impl Future<Output = Result<WeatherSnapshot, WeatherError>> + Send;
}
