use serde::{Deserialize, Serialize};

/// A "part" of a coordinate pair
pub type CoordinateComponent = f64;

/// Some point in the world, either from the Geolocation API or a fixed point of interest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, specta::Type)]
pub struct Coordinates {
    /// Latitude
    pub latitude: CoordinateComponent,
    /// Longitude
    pub longitude: CoordinateComponent,
}

impl Coordinates {
    pub const fn new(latitude: CoordinateComponent, longitude: CoordinateComponent) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Outcome of asking the platform for foreground location access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, specta::Type)]
pub enum LocationPermission {
    Granted,
    Denied,
}

impl LocationPermission {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

pub trait LocationService: Send + Sync {
    /// Ask the platform for foreground location access. Asking again after access was granted
    /// should be a no-op that reports [LocationPermission::Granted].
    fn request_permission(
        &self,
    ) -> impl Future<Output = anyhow::Result<LocationPermission>> + Send;
    /// Get a single fix of the device's current position
    fn current_position(&self) -> impl Future<Output = anyhow::Result<Coordinates>> + Send;
}
