use std::{sync::Arc, time::Duration};

use log::error;
use parkcast_logic::{
    Controller as BaseController, ControllerSettings, MapRegion, MapService, StateUpdateSender,
    prelude::*,
};
use parkcast_weather::OpenWeatherClient;
use serde::{Deserialize, Serialize};
use tauri::AppHandle;
use tauri_plugin_opener::OpenerExt;
use tauri_specta::Event;

use crate::location::TauriLocation;

/// The location or weather changed, you're expected to call `get_controller_state` when
/// receiving this
#[derive(Serialize, Deserialize, Clone, Default, Debug, specta::Type, tauri_specta::Event)]
pub struct ControllerStateUpdate;

/// Move the map's camera to `region`, animating over `duration_ms`
#[derive(Serialize, Deserialize, Clone, Debug, specta::Type, tauri_specta::Event)]
pub struct AnimateCamera {
    pub region: MapRegion,
    pub duration_ms: u32,
}

pub struct TauriStateUpdateSender(AppHandle);

impl StateUpdateSender for TauriStateUpdateSender {
    fn send_update(&self) {
        if let Err(why) = ControllerStateUpdate.emit(&self.0) {
            error!("Error sending controller state update to UI: {why:?}");
        }
    }
}

/// The map lives in the web view, camera moves are sent to it as [AnimateCamera] events
pub struct TauriMap(AppHandle);

impl MapService for TauriMap {
    fn animate_to_region(&self, region: MapRegion, duration: Duration) {
        let event = AnimateCamera {
            region,
            duration_ms: u32::try_from(duration.as_millis()).unwrap_or(u32::MAX),
        };
        if let Err(why) = event.emit(&self.0) {
            error!("Error sending camera move to UI: {why:?}");
        }
    }

    fn open_url(&self, url: &str) -> Result {
        self.0
            .opener()
            .open_url(url, None::<&str>)
            .context("Platform couldn't open URL")
    }
}

pub type Controller =
    BaseController<TauriLocation, OpenWeatherClient, TauriMap, TauriStateUpdateSender>;

pub type AppStateHandle = Arc<Controller>;

/// Wire the controller up to the app's plugins, fails if there's no weather credential
pub fn create_controller(app: &AppHandle) -> Result<AppStateHandle> {
    let weather = OpenWeatherClient::from_env().context("Failed to set up weather client")?;
    let controller = Controller::new(
        ControllerSettings::default(),
        TauriLocation::new(app.clone()),
        weather,
        TauriMap(app.clone()),
        TauriStateUpdateSender(app.clone()),
    );
    Ok(Arc::new(controller))
}
