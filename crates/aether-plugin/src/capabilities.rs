//! Capability declarations reported to the host.

use aether_core::{AugmentedFluxLags, FluxLags};
use serde::Serialize;

/// Registration identifier the host uses to load the plugin.
pub const PROG_ID: &str = "Python.Density.HPOP";

/// Stable registration GUID.
pub const PLUGIN_GUID: &str = "E6E94E61-4CD9-4E2C-ACB9-FE68B8694B81";

/// Lowest altitude (m) at which the model is valid.
pub const LOWEST_VALID_ALTITUDE_M: f64 = 90_000.0;

/// What a density model tells the host about itself.
///
/// Every method has the value this plugin declares; none depend on
/// lifecycle state.
pub trait DensityModel {
    /// Name of the central body the model applies to.
    fn central_body(&self) -> &'static str {
        "Earth"
    }

    /// Whether the model also computes temperature.
    fn computes_temperature(&self) -> bool {
        false
    }

    /// Whether the model also computes pressure.
    fn computes_pressure(&self) -> bool {
        false
    }

    /// Whether the host should supply augmented space-weather data.
    fn uses_augmented_space_weather(&self) -> bool {
        true
    }

    /// Solar and geomagnetic flux lags.
    fn atm_flux_lags(&self) -> FluxLags {
        FluxLags::default()
    }

    /// Augmented flux lags.
    fn augmented_atm_flux_lags(&self) -> AugmentedFluxLags {
        AugmentedFluxLags::default()
    }

    /// Lowest valid altitude in meters.
    fn lowest_valid_altitude(&self) -> f64 {
        LOWEST_VALID_ALTITUDE_M
    }

    /// All declarations as one serializable record.
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            prog_id: PROG_ID,
            guid: PLUGIN_GUID,
            central_body: self.central_body(),
            computes_temperature: self.computes_temperature(),
            computes_pressure: self.computes_pressure(),
            uses_augmented_space_weather: self.uses_augmented_space_weather(),
            atm_flux_lags: self.atm_flux_lags(),
            augmented_atm_flux_lags: self.augmented_atm_flux_lags(),
            lowest_valid_altitude_m: self.lowest_valid_altitude(),
        }
    }
}

/// The declarations alone, for callers without a configured plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredModel;

impl DensityModel for DeclaredModel {}

/// Snapshot of a model's capability declarations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Registration identifier.
    pub prog_id: &'static str,
    /// Registration GUID.
    pub guid: &'static str,
    /// Central body.
    pub central_body: &'static str,
    /// Temperature output.
    pub computes_temperature: bool,
    /// Pressure output.
    pub computes_pressure: bool,
    /// Augmented space-weather input.
    pub uses_augmented_space_weather: bool,
    /// Flux lags.
    pub atm_flux_lags: FluxLags,
    /// Augmented flux lags.
    pub augmented_atm_flux_lags: AugmentedFluxLags,
    /// Lowest valid altitude in meters.
    pub lowest_valid_altitude_m: f64,
}
