//! Density queries, scenario bounds and density results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::DensityEval;

/// Name of the host date field carrying the query epoch.
///
/// The host reports this field as elapsed minutes since scenario start,
/// which is what the external model expects as its first argument.
pub const EPOCH_FIELD: &str = "EpMin";

/// One density request from the propagation host.
///
/// Coordinates are geodetic: latitude and longitude in radians, altitude
/// above the reference ellipsoid in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityQuery {
    /// Epoch in the host's date/time string format.
    pub epoch: String,
    /// Geodetic latitude in radians.
    pub latitude_rad: f64,
    /// Longitude in radians.
    pub longitude_rad: f64,
    /// Altitude in meters.
    pub altitude_m: f64,
}

impl DensityQuery {
    /// Create a new query.
    #[must_use]
    pub fn new(
        epoch: impl Into<String>,
        latitude_rad: f64,
        longitude_rad: f64,
        altitude_m: f64,
    ) -> Self {
        Self {
            epoch: epoch.into(),
            latitude_rad,
            longitude_rad,
            altitude_m,
        }
    }

    /// Read a query from a host evaluation object.
    #[must_use]
    pub fn from_eval(eval: &dyn DensityEval) -> Self {
        let (latitude_rad, longitude_rad, altitude_m) = eval.lat_lon_alt();
        Self {
            epoch: eval.date_string(EPOCH_FIELD),
            latitude_rad,
            longitude_rad,
            altitude_m,
        }
    }
}

/// The simulation's overall start/stop bounds, as host-formatted strings.
///
/// Passed through to the external model untouched; it uses the start time
/// together with the query epoch to locate its data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioWindow {
    /// Scenario start time.
    pub start: String,
    /// Scenario stop time.
    pub stop: String,
}

impl ScenarioWindow {
    /// Create a new scenario window.
    #[must_use]
    pub fn new(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            stop: stop.into(),
        }
    }
}

/// Atmospheric mass density in kg/m³.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Density(f64);

impl Density {
    /// Wrap a raw kg/m³ value. No plausibility checks are applied.
    #[must_use]
    pub const fn from_kg_per_m3(value: f64) -> Self {
        Self(value)
    }

    /// The density in kg/m³.
    #[must_use]
    pub const fn kg_per_m3(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kg/m^3", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEval;

    impl DensityEval for FixedEval {
        fn date_string(&self, field: &str) -> String {
            format!("{field}:12.5")
        }

        fn lat_lon_alt(&self) -> (f64, f64, f64) {
            (0.1, -0.2, 400_000.0)
        }

        fn set_density(&mut self, _density: f64) {}
    }

    #[test]
    fn test_from_eval_reads_epoch_field() {
        let query = DensityQuery::from_eval(&FixedEval);
        assert_eq!(query.epoch, "EpMin:12.5");
        assert_eq!(query.latitude_rad, 0.1);
        assert_eq!(query.longitude_rad, -0.2);
        assert_eq!(query.altitude_m, 400_000.0);
    }

    #[test]
    fn test_density_serializes_as_bare_number() {
        let json = serde_json::to_string(&Density::from_kg_per_m3(1.225)).unwrap();
        assert_eq!(json, "1.225");
    }

    #[test]
    fn test_density_display() {
        assert_eq!(Density::from_kg_per_m3(2.5).to_string(), "2.5 kg/m^3");
    }
}
