//! Configuration verification and the host-visible config view.

use aether_bridge::{BridgeConfig, resolve_executable};
use serde::Serialize;

use crate::config_bridge::PluginSettings;

/// Outcome of a configuration check, as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigVerifyResult {
    /// Whether the configuration is usable.
    pub result: bool,
    /// `"OK"`, or the reason it is not.
    pub message: String,
}

impl ConfigVerifyResult {
    /// A passing result.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            result: true,
            message: "OK".to_string(),
        }
    }

    /// A failing result with `reason`.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            result: false,
            message: reason.into(),
        }
    }
}

/// Check that the interpreter resolves and the script exists.
#[must_use]
pub fn verify_bridge_config(config: &BridgeConfig) -> ConfigVerifyResult {
    if let Err(e) = resolve_executable(&config.interpreter) {
        return ConfigVerifyResult::failed(e.to_string());
    }

    if !config.script.is_file() {
        return ConfigVerifyResult::failed(format!(
            "model script not found: {}",
            config.script.display()
        ));
    }

    if let Some(dir) = &config.working_dir
        && !dir.is_dir()
    {
        return ConfigVerifyResult::failed(format!(
            "model working directory not found: {}",
            dir.display()
        ));
    }

    ConfigVerifyResult::ok()
}

/// The plugin's effective configuration, as shown to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginConfigView {
    /// Interpreter executable.
    pub interpreter: String,
    /// Model script.
    pub script: String,
    /// Per-run timeout in seconds.
    pub timeout_secs: u64,
    /// Process concurrency limit.
    pub max_concurrent_processes: usize,
    /// Working directory, if any.
    pub working_dir: Option<String>,
    /// Environment sandboxing.
    pub sandboxed: bool,
    /// Lifecycle debug messages.
    pub debug: bool,
    /// Host date format applied at init.
    pub date_format: String,
    /// Failure policy name.
    pub failure_mode: &'static str,
}

impl PluginConfigView {
    /// Build the view from the bridge config and plugin settings.
    #[must_use]
    pub fn new(bridge: &BridgeConfig, settings: &PluginSettings) -> Self {
        Self {
            interpreter: bridge.interpreter.display().to_string(),
            script: bridge.script.display().to_string(),
            timeout_secs: bridge.timeout.as_secs(),
            max_concurrent_processes: bridge.max_concurrent_processes,
            working_dir: bridge.working_dir.as_ref().map(|d| d.display().to_string()),
            sandboxed: bridge.sandboxed,
            debug: settings.debug,
            date_format: settings.date_format.clone(),
            failure_mode: settings.failure_policy.mode(),
        }
    }
}
