//! Space-weather flux lag declarations.
//!
//! A density model tells the host how far back to sample each flux index.
//! Models that take no flux inputs report all lags as zero.

use serde::{Deserialize, Serialize};

/// Lags (in days) for the standard F10.7 and geomagnetic indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FluxLags {
    /// Daily F10.7 lag.
    pub f10p7_lag: f64,
    /// 81-day mean F10.7 lag.
    pub f10p7_mean_lag: f64,
    /// Geomagnetic flux lag.
    pub geo_flux_lag: f64,
}

/// Lags (in days) for the augmented JB2008-style indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AugmentedFluxLags {
    /// M10.7 lag.
    pub m10p7_lag: f64,
    /// 81-day mean M10.7 lag.
    pub m10p7_mean_lag: f64,
    /// S10.7 lag.
    pub s10p7_lag: f64,
    /// 81-day mean S10.7 lag.
    pub s10p7_mean_lag: f64,
    /// Y10.7 lag.
    pub y10p7_lag: f64,
    /// 81-day mean Y10.7 lag.
    pub y10p7_mean_lag: f64,
    /// Dst temperature-change lag.
    pub dst_dtc_lag: f64,
}
