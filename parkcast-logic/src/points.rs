use serde::Serialize;

use crate::location::Coordinates;

/// A fixed, named place shown as a marker on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, specta::Type)]
pub struct PointOfInterest {
    /// Stable id, unique within [POINTS_OF_INTEREST]
    pub id: u32,
    pub name: &'static str,
    pub coordinates: Coordinates,
}

const fn poi(id: u32, name: &'static str, latitude: f64, longitude: f64) -> PointOfInterest {
    PointOfInterest {
        id,
        name,
        coordinates: Coordinates::new(latitude, longitude),
    }
}

/// Parks shown on the map
pub const POINTS_OF_INTEREST: [PointOfInterest; 7] = [
    poi(1, "Bayfront Park", 43.270365, -79.871871),
    poi(2, "Gage Park", 43.241850, -79.837614),
    poi(3, "Dundurn Park", 43.270217, -79.883681),
    poi(4, "Pier 4 Park", 43.273064, -79.866806),
    poi(5, "Cootes Paradise Sanctuary", 43.273642, -79.935204),
    poi(6, "Sam Lawrence Park", 43.247989, -79.866009),
    poi(
        7,
        "Royal Botanical Gardens (RBG) Arboretum",
        43.289587,
        -79.897256,
    ),
];

pub fn find_point_of_interest(id: u32) -> Option<&'static PointOfInterest> {
    POINTS_OF_INTEREST.iter().find(|p| p.id == id)
}
