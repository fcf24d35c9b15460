use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::location::Coordinates;

/// A viewport on the map, a center plus how much latitude/longitude is visible around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, specta::Type)]
pub struct MapRegion {
    pub center: Coordinates,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    pub const fn around(center: Coordinates, delta: f64) -> Self {
        Self {
            center,
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }
}

/// Viewport the map opens on, downtown Hamilton
pub const INITIAL_REGION: MapRegion = MapRegion::around(Coordinates::new(43.2557, -79.8711), 0.05);

const EXTERNAL_MAP_URL: &str = "https://www.google.com/maps";

/// Web maps link for the given coordinates at a fixed zoom level
pub fn external_map_url(coordinates: Coordinates, zoom: u8) -> String {
    format!(
        "{EXTERNAL_MAP_URL}?q={},{}&z={zoom}",
        coordinates.latitude, coordinates.longitude
    )
}

pub trait MapService: Send + Sync {
    /// Move the map's camera to `region`, animating over `duration`.
    /// Fire and forget, the map doesn't report when it's done.
    fn animate_to_region(&self, region: MapRegion, duration: Duration);
    /// Hand a URL off to whatever the platform uses to open links
    fn open_url(&self, url: &str) -> anyhow::Result<()>;
}
