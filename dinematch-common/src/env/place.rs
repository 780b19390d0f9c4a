use serde::{Deserialize, Serialize};

/// A candidate venue returned by the places directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Opaque identifier, unique per real-world venue.
    pub place_id: String,

    /// Display name shown to members and in consensus reports.
    pub name: String,
}

impl Place {
    pub fn new(place_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
        }
    }
}

/// Search filter a session was created with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Maximum distance from the anchor location, in meters.
    pub distance: i32,

    /// Minimum price tier (0-4).
    pub price: i32,

    /// Minimum rating (1.0 - 5.0).
    pub rating: f64,
}

/// Everything the places directory needs to produce a candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacesQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub parameters: Parameters,
}

impl PlacesQuery {
    /// `lat,lng` as the places directory expects it.
    pub fn location(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }
}
