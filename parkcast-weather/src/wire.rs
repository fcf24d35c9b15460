use parkcast_logic::{WeatherError, WeatherSnapshot};
use serde::Deserialize;

/// The parts of OpenWeatherMap's `/weather` response we use
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainReadings,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    /// In Celsius, requests always ask for metric units
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

pub fn parse_current_weather(body: &[u8]) -> Result<WeatherSnapshot, WeatherError> {
    let response = serde_json::from_slice::<CurrentWeatherResponse>(body)
        .map_err(|err| WeatherError::MalformedResponse(err.to_string()))?;

    let description = response
        .weather
        .into_iter()
        .next()
        .map(|condition| condition.description)
        .ok_or_else(|| WeatherError::MalformedResponse("Empty weather condition list".into()))?;

    Ok(WeatherSnapshot {
        temperature_celsius: response.main.temp,
        description,
    })
}
