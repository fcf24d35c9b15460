use log::debug;
use parkcast_logic::{Coordinates, WeatherError, WeatherService, WeatherSnapshot, prelude::*};
use reqwest::{Client, Url};

use crate::{config::WeatherConfig, wire::parse_current_weather};

const USER_AGENT: &str = const_str::concat!("parkcast/", env!("CARGO_PKG_VERSION"));

/// [WeatherService] backed by OpenWeatherMap's current weather endpoint
pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

fn network_error(err: reqwest::Error) -> WeatherError {
    WeatherError::Network {
        status: err.status().map(|s| s.as_u16()),
        // The URL carries the app id
        message: err.without_url().to_string(),
    }
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Client using [WeatherConfig::from_env]
    pub fn from_env() -> Result<Self> {
        Self::new(WeatherConfig::from_env()?)
    }

    fn request_url(&self, coordinates: Coordinates) -> StdResult<Url, WeatherError> {
        let endpoint = format!("{}/weather", self.config.base_url.trim_end_matches('/'));
        Url::parse_with_params(
            &endpoint,
            [
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("appid", self.config.app_id.clone()),
                ("units", "metric".to_string()),
            ],
        )
        .map_err(|err| WeatherError::Network {
            status: None,
            message: format!("Invalid weather URL {endpoint}: {err}"),
        })
    }
}

impl WeatherService for OpenWeatherClient {
    async fn current_weather(
        &self,
        coordinates: Coordinates,
    ) -> StdResult<WeatherSnapshot, WeatherError> {
        let url = self.request_url(coordinates)?;

        debug!(
            "Requesting weather for {}, {}",
            coordinates.latitude, coordinates.longitude
        );

        let resp = self.client.get(url).send().await.map_err(network_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::Network {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("Server returned error")
                    .to_string(),
            });
        }

        let body = resp.bytes().await.map_err(network_error)?;
        parse_current_weather(&body)
    }
}
