//! Unit conversion from host coordinates to model inputs.
//!
//! The host speaks geodetic radians and meters. The model expects degrees,
//! with longitude measured eastward on `[0, 360)`, and kilometers.

use aether_core::DensityQuery;

/// Latitude in degrees.
#[must_use]
pub fn latitude_deg(latitude_rad: f64) -> f64 {
    latitude_rad.to_degrees()
}

/// Longitude in degrees, re-based from `[-180, 180)` to `[0, 360)`.
#[must_use]
pub fn longitude_deg(longitude_rad: f64) -> f64 {
    let deg = longitude_rad.to_degrees() + 180.0;
    // Inputs within an ulp or so of π round up to exactly 360.
    if deg >= 360.0 { deg - 360.0 } else { deg }
}

/// Altitude in kilometers.
#[must_use]
pub fn altitude_km(altitude_m: f64) -> f64 {
    altitude_m / 1000.0
}

/// A query position expressed in model units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelCoordinates {
    /// Latitude in degrees.
    pub latitude_deg: f64,
    /// Longitude in degrees on `[0, 360)`.
    pub longitude_deg: f64,
    /// Altitude in kilometers.
    pub altitude_km: f64,
}

impl ModelCoordinates {
    /// Convert the position of `query`.
    #[must_use]
    pub fn from_query(query: &DensityQuery) -> Self {
        Self {
            latitude_deg: latitude_deg(query.latitude_rad),
            longitude_deg: longitude_deg(query.longitude_rad),
            altitude_km: altitude_km(query.altitude_m),
        }
    }
}
