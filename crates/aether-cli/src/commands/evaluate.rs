//! `aether evaluate` - one density query.

use aether_config::Config;
use aether_core::{DensityQuery, ScenarioWindow};
use anyhow::Result;
use serde::Serialize;

use super::{OutputFormat, initialized_plugin};

/// A query position as given on the command line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Position {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) altitude_m: f64,
    pub(crate) degrees: bool,
}

impl Position {
    /// Build a query, converting degrees to radians when requested.
    pub(crate) fn to_query(self, epoch: &str) -> DensityQuery {
        let (lat, lon) = if self.degrees {
            (self.latitude.to_radians(), self.longitude.to_radians())
        } else {
            (self.latitude, self.longitude)
        };
        DensityQuery::new(epoch, lat, lon, self.altitude_m)
    }
}

#[derive(Serialize)]
struct EvaluationOutput<'a> {
    epoch: &'a str,
    latitude_rad: f64,
    longitude_rad: f64,
    altitude_m: f64,
    density_kg_m3: f64,
}

/// Run one evaluation and print the density.
pub(crate) fn run_evaluate(
    cfg: &Config,
    epoch: &str,
    position: Position,
    window: ScenarioWindow,
    format: OutputFormat,
) -> Result<()> {
    let plugin = initialized_plugin(cfg, window)?;
    let query = position.to_query(epoch);

    let density = plugin.evaluate_query(&query)?;
    plugin.free();

    match format {
        OutputFormat::Json => {
            let output = EvaluationOutput {
                epoch,
                latitude_rad: query.latitude_rad,
                longitude_rad: query.longitude_rad,
                altitude_m: query.altitude_m,
                density_kg_m3: density.kg_per_m3(),
            };
            println!("{}", serde_json::to_string(&output)?);
        },
        OutputFormat::Pretty => println!("{density}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_converted() {
        let position = Position {
            latitude: 90.0,
            longitude: -180.0,
            altitude_m: 400_000.0,
            degrees: true,
        };
        let query = position.to_query("1440");
        assert!((query.latitude_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((query.longitude_rad + std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(query.altitude_m, 400_000.0);
    }

    #[test]
    fn test_radians_passed_through() {
        let position = Position {
            latitude: 0.5,
            longitude: -1.0,
            altitude_m: 1.0,
            degrees: false,
        };
        let query = position.to_query("0");
        assert_eq!(query.latitude_rad, 0.5);
        assert_eq!(query.longitude_rad, -1.0);
    }
}
