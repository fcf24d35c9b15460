mod client;
mod config;
mod wire;

pub use client::OpenWeatherClient;
pub use config::{APP_ID_VAR, WeatherConfig};
