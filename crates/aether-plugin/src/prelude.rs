//! Prelude module - commonly used types for convenient import.
//!
//! Use `use aether_plugin::prelude::*;` to import all essential types.

pub use crate::{DensityModel, DensityPlugin, PluginState};

pub use crate::{PluginError, PluginResult};

pub use crate::{ConfigVerifyResult, FailurePolicy, PluginSettings};
