use serde::Deserialize;

use crate::domain::{Candidate, Coordinate, Rating};

/// Status value of a successful Nearby Search response.
pub const STATUS_OK: &str = "OK";

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRequest {
    pub center: Coordinate,
    pub radius_m: u32,
    pub keyword: String,
    pub open_now: bool,
}

#[derive(Debug, Deserialize)]
pub struct NearbyResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<RawPlace>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: Geometry,
    pub place_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<RawPlace> for Candidate {
    fn from(place: RawPlace) -> Self {
        Self {
            name: place.name,
            rating: Rating::from_option(place.rating),
            address: place.vicinity.filter(|vicinity| !vicinity.trim().is_empty()),
            location: Coordinate::new(place.geometry.location.lat, place.geometry.location.lng),
            place_id: place.place_id,
        }
    }
}
