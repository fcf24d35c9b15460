mod controller;
mod controller_state;
mod error;
mod location;
mod map;
mod points;
mod settings;
mod weather;

pub use controller::{Controller, StateUpdateSender};
pub use controller_state::ControllerUiState;
pub use error::ControllerError;
pub use location::{Coordinates, LocationPermission, LocationService};
pub use map::{INITIAL_REGION, MapRegion, MapService, external_map_url};
pub use points::{POINTS_OF_INTEREST, PointOfInterest, find_point_of_interest};
pub use settings::{ControllerSettings, WeatherOrdering};
pub use weather::{WeatherError, WeatherService, WeatherSnapshot};

/// Convenience alias for UTC DT
pub type UtcDT = chrono::DateTime<chrono::Utc>;

pub mod prelude {
    use anyhow::Error as AnyhowError;
    pub use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
