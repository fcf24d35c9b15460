use std::{fmt, time::Duration};

use parkcast_logic::prelude::*;

/// Environment variable holding the OpenWeatherMap credential
pub const APP_ID_VAR: &str = "OPENWEATHER_APP_ID";

/// Credential baked in at build time, used when the variable isn't set at runtime
const BUILD_APP_ID: Option<&str> = option_env!("OPENWEATHER_APP_ID");

const fn base_url() -> &'static str {
    if let Some(url) = option_env!("OPENWEATHER_BASE_URL") {
        url
    } else {
        "https://api.openweathermap.org/data/2.5"
    }
}

const fn timeout_secs() -> u64 {
    if let Some(secs) = option_env!("OPENWEATHER_TIMEOUT_SECS") {
        const_str::parse!(secs, u64)
    } else {
        10
    }
}

const BASE_URL: &str = base_url();
const TIMEOUT: Duration = Duration::from_secs(timeout_secs());

#[derive(Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap `appid`
    pub app_id: String,
    /// Everything before `/weather`
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("app_id", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn resolve_app_id(runtime: Option<String>, build: Option<&str>) -> Option<String> {
    runtime
        .filter(|id| !id.trim().is_empty())
        .or_else(|| build.filter(|id| !id.trim().is_empty()).map(str::to_string))
}

impl WeatherConfig {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            base_url: BASE_URL.to_string(),
            timeout: TIMEOUT,
        }
    }

    /// Read the credential from [APP_ID_VAR], falling back to the value present at build time
    pub fn from_env() -> Result<Self> {
        let app_id = resolve_app_id(std::env::var(APP_ID_VAR).ok(), BUILD_APP_ID)
            .with_context(|| format!("No weather API credential, set {APP_ID_VAR}"))?;
        Ok(Self::new(app_id))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
