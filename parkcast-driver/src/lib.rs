use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use log::info;
use parkcast_logic::{
    ControllerError, Coordinates, LocationPermission, LocationService, MapRegion, MapService,
    StateUpdateSender, WeatherError, WeatherService, WeatherSnapshot,
};
use parkcast_weather::OpenWeatherClient;

pub mod prelude {
    pub use anyhow::{Context, anyhow, bail};
    pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
}

pub use prelude::*;

/// Geolocation that always answers with a fixed position, or always refuses
pub struct SimulatedLocation {
    permission: LocationPermission,
    position: Coordinates,
}

impl SimulatedLocation {
    pub fn at(position: Coordinates) -> Self {
        Self {
            permission: LocationPermission::Granted,
            position,
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: LocationPermission::Denied,
            position: Coordinates::new(0.0, 0.0),
        }
    }
}

impl LocationService for SimulatedLocation {
    async fn request_permission(&self) -> Result<LocationPermission> {
        Ok(self.permission)
    }

    async fn current_position(&self) -> Result<Coordinates> {
        if self.permission.is_granted() {
            Ok(self.position)
        } else {
            bail!("Location permission was never granted")
        }
    }
}

/// Live OpenWeatherMap, or nothing when no credential is configured
pub enum DriverWeather {
    Live(OpenWeatherClient),
    Offline,
}

impl WeatherService for DriverWeather {
    async fn current_weather(
        &self,
        coordinates: Coordinates,
    ) -> std::result::Result<WeatherSnapshot, WeatherError> {
        match self {
            Self::Live(client) => client.current_weather(coordinates).await,
            Self::Offline => Err(WeatherError::Network {
                status: None,
                message: "No weather API credential configured".to_string(),
            }),
        }
    }
}

/// Map that writes camera moves and opened links to the log
#[derive(Default)]
pub struct ConsoleMap {
    camera_moves: AtomicUsize,
    opened: Mutex<Vec<String>>,
}

impl ConsoleMap {
    pub fn camera_moves(&self) -> usize {
        self.camera_moves.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl MapService for ConsoleMap {
    fn animate_to_region(&self, region: MapRegion, duration: Duration) {
        self.camera_moves.fetch_add(1, Ordering::SeqCst);
        info!(
            "Camera -> {}, {} (deltas {}, {}) over {}ms",
            region.center.latitude,
            region.center.longitude,
            region.latitude_delta,
            region.longitude_delta,
            duration.as_millis()
        );
    }

    fn open_url(&self, url: &str) -> Result {
        info!("Opening {url}");
        self.opened
            .lock()
            .map_err(|_| anyhow!("Opened link list poisoned"))?
            .push(url.to_string());
        Ok(())
    }
}

/// Counts updates and keeps failures so the driver can exit non-zero
#[derive(Default)]
pub struct ConsoleSender {
    updates: AtomicUsize,
    failures: Mutex<Vec<ControllerError>>,
}

impl ConsoleSender {
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> Vec<ControllerError> {
        self.failures.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl StateUpdateSender for ConsoleSender {
    fn send_update(&self) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    fn report_failure(&self, failure: &ControllerError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(failure.clone());
        }
    }
}
