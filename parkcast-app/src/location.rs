use parkcast_logic::{Coordinates, LocationPermission, LocationService, prelude::*};
use tauri::{AppHandle, plugin::PermissionState};
use tauri_plugin_geolocation::{GeolocationExt, PermissionType, PositionOptions};

pub struct TauriLocation(AppHandle);

impl TauriLocation {
    pub fn new(app: AppHandle) -> Self {
        Self(app)
    }
}

const OPTIONS: PositionOptions = PositionOptions {
    enable_high_accuracy: true,
    timeout: 10000,
    maximum_age: 2000,
};

impl LocationService for TauriLocation {
    async fn request_permission(&self) -> Result<LocationPermission> {
        let app = self.0.clone();
        let status = tauri::async_runtime::spawn_blocking(move || {
            app.geolocation()
                .request_permissions(Some(vec![PermissionType::Location]))
        })
        .await
        .context("Permission task failed")?
        .context("Failed to request location permission")?;

        Ok(match status.location {
            PermissionState::Granted => LocationPermission::Granted,
            _ => LocationPermission::Denied,
        })
    }

    async fn current_position(&self) -> Result<Coordinates> {
        let app = self.0.clone();
        let pos = tauri::async_runtime::spawn_blocking(move || {
            app.geolocation().get_current_position(Some(OPTIONS))
        })
        .await
        .context("Location task failed")?
        .context("Failed to get current position")?;

        Ok(Coordinates::new(pos.coords.latitude, pos.coords.longitude))
    }
}
