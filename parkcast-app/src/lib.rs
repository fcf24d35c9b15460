mod location;
mod state;

use log::{LevelFilter, info};
use parkcast_logic::{
    ControllerUiState, Coordinates, INITIAL_REGION, MapRegion, PointOfInterest,
};
use tauri::{Manager, State};
use tauri_specta::{ErrorHandlingMode, collect_commands, collect_events};

use std::result::Result as StdResult;

use crate::state::{AnimateCamera, AppStateHandle, ControllerStateUpdate, create_controller};

type Result<T = (), E = String> = StdResult<T, E>;

#[tauri::command]
#[specta::specta]
/// Get every point of interest to show as a marker, this list never changes
fn get_points_of_interest(state: State<'_, AppStateHandle>) -> Vec<PointOfInterest> {
    state.points_of_interest().to_vec()
}

#[tauri::command]
#[specta::specta]
/// Get the region the map should show before the user's location is known
fn get_initial_region() -> MapRegion {
    INITIAL_REGION
}

#[tauri::command]
#[specta::specta]
/// Get the user's location and the latest weather, call after receiving [ControllerStateUpdate]
async fn get_controller_state(state: State<'_, AppStateHandle>) -> Result<ControllerUiState> {
    Ok(state.get_ui_state().await)
}

#[tauri::command]
#[specta::specta]
/// "Find My Location" button. Locates the user, sends an [AnimateCamera] event to center the map
/// on them, then fetches weather for where they are. Failures are logged, not returned.
async fn find_my_location(state: State<'_, AppStateHandle>) -> Result {
    state.find_my_location().await;
    Ok(())
}

#[tauri::command]
#[specta::specta]
/// A marker was pressed, fetch weather for the point of interest with id `id`.
/// Errors only if the id is unknown.
async fn select_point_of_interest(id: u32, state: State<'_, AppStateHandle>) -> Result {
    state
        .select_point_of_interest(id)
        .await
        .map_err(|err| err.to_string())
}

#[tauri::command]
#[specta::specta]
/// A callout was pressed, open `coordinates` in an external maps app
fn open_external_map(coordinates: Coordinates, state: State<'_, AppStateHandle>) -> Result {
    state.open_external_map(coordinates);
    Ok(())
}

pub fn mk_specta() -> tauri_specta::Builder {
    tauri_specta::Builder::<tauri::Wry>::new()
        .error_handling(ErrorHandlingMode::Throw)
        .commands(collect_commands![
            get_points_of_interest,
            get_initial_region,
            get_controller_state,
            find_my_location,
            select_point_of_interest,
            open_external_map,
        ])
        .events(collect_events![ControllerStateUpdate, AnimateCamera])
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = mk_specta();

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(LevelFilter::Debug)
                .build(),
        )
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_geolocation::init())
        .invoke_handler(builder.invoke_handler())
        .setup(move |app| {
            builder.mount_events(app);

            let controller = create_controller(app.handle())?;
            app.manage(controller.clone());

            tauri::async_runtime::spawn(async move {
                controller.initialize().await;
                info!("Controller initialized");
            });
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
