//! Aether Plugin - Host adapter for the external density model.
//!
//! Exposes the model to a propagation host as a density plugin:
//!
//! - **Capabilities**: fixed declarations (Earth, no temperature or
//!   pressure, augmented space weather, 90 km floor)
//! - **Lifecycle**: `register`, `init`, `free`, tracked as [`PluginState`]
//! - **Evaluation**: blocking `evaluate` that runs one model process per
//!   query through [`aether_bridge::DensityBridge`]
//! - **Verification**: interpreter and script checks reported as a
//!   [`ConfigVerifyResult`]
//!
//! Failures are logged through `tracing` and the host message channel, then
//! handled according to the configured [`FailurePolicy`].
//!
//! # Example
//!
//! ```rust,ignore
//! use aether_config::Config;
//! use aether_plugin::DensityPlugin;
//!
//! let config = Config::load(None)?.config;
//! let plugin = DensityPlugin::from_config(&config)?;
//! plugin.init(host_site)?;
//! let density = plugin.evaluate(&mut host_eval)?;
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod capabilities;
pub mod config_bridge;
pub mod error;
pub mod plugin;
pub mod policy;
pub mod verify;

pub use capabilities::{
    Capabilities, DeclaredModel, DensityModel, LOWEST_VALID_ALTITUDE_M, PLUGIN_GUID, PROG_ID,
};
pub use config_bridge::PluginSettings;
pub use error::{PluginError, PluginResult};
pub use plugin::{DensityPlugin, PluginState};
pub use policy::FailurePolicy;
pub use verify::{ConfigVerifyResult, PluginConfigView};
