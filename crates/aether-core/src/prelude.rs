//! Prelude module - commonly used types for convenient import.
//!
//! Use `use aether_core::prelude::*;` to import all essential types.

// Query and result types
pub use crate::{Density, DensityQuery, ScenarioWindow};

// Host collaborator traits
pub use crate::{DensityEval, MessageSeverity, PluginSite, RegisterResult};

// Space weather
pub use crate::{AugmentedFluxLags, FluxLags};
