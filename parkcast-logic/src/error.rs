use crate::weather::WeatherError;

/// Everything that can go wrong while the controller talks to the platform.
/// None of these are surfaced to the user, they're reported through
/// [crate::StateUpdateSender::report_failure] and otherwise leave state alone.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControllerError {
    #[error("Permission to access location was denied")]
    PermissionDenied,
    #[error("Failed to get current position: {0}")]
    Location(String),
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error("Error opening external map: {0}")]
    ExternalOpenFailure(String),
    #[error("No point of interest with id {0}")]
    UnknownPointOfInterest(u32),
}
