//! Plugin error types.

use aether_bridge::BridgeError;

/// Errors surfaced to the host by the density plugin.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// `evaluate` was called outside the initialized state.
    #[error("plugin is not initialized")]
    NotInitialized,

    /// The host has no scenario loaded, so start/stop are unknown.
    #[error("no scenario is loaded in the host")]
    ScenarioUnavailable,

    /// The plugin configuration cannot be used.
    #[error("invalid plugin configuration: {0}")]
    ConfigurationInvalid(String),

    /// The external model failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// The plugin's async runtime could not be created.
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;
