//! Aether Core - Foundation types and host traits for the Aether density bridge.
//!
//! This crate provides:
//! - The per-step query the propagation host hands to a density model
//! - The scenario window and density result types
//! - Space-weather flux lag records declared by density models
//! - The narrow traits a host implements to load and drive a density plugin

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod host;
pub mod query;
pub mod space_weather;

pub use host::{DensityEval, MessageSeverity, PluginSite, RegisterResult};
pub use query::{Density, DensityQuery, EPOCH_FIELD, ScenarioWindow};
pub use space_weather::{AugmentedFluxLags, FluxLags};
