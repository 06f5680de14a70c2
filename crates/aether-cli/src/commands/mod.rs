//! CLI command implementations.

pub(crate) mod batch;
pub(crate) mod capabilities;
pub(crate) mod config;
pub(crate) mod evaluate;
pub(crate) mod verify;

use std::path::Path;
use std::sync::Arc;

use aether_config::Config;
use aether_core::ScenarioWindow;
use aether_plugin::DensityPlugin;
use anyhow::{Context, Result};

use crate::site::StandaloneSite;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Human-readable text.
    Pretty,
    /// One JSON document per result.
    Json,
}

/// Load the layered configuration.
pub(crate) fn load_config(config_file: Option<&Path>) -> Result<Config> {
    Config::load(config_file)
        .map(|resolved| resolved.config)
        .context("failed to load configuration")
}

/// Build a plugin from config and initialize it against a standalone site.
pub(crate) fn initialized_plugin(cfg: &Config, window: ScenarioWindow) -> Result<DensityPlugin> {
    let plugin = DensityPlugin::from_config(cfg).context("failed to create density plugin")?;
    plugin
        .init(Arc::new(StandaloneSite::new(window)))
        .context("failed to initialize density plugin")?;
    Ok(plugin)
}
