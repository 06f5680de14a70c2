//! `aether config` - show resolved configuration and search paths.

use std::path::Path;

use aether_config::{Config, ResolvedConfig, ShowFormat};
use anyhow::{Context, Result};

/// Print the resolved configuration with source annotations.
pub(crate) fn show_config(
    config_file: Option<&Path>,
    format: &str,
    section: Option<&str>,
) -> Result<()> {
    let format = match format {
        "json" => ShowFormat::Json,
        "toml" => ShowFormat::Toml,
        other => anyhow::bail!("unknown format '{other}'; expected toml or json"),
    };

    let resolved = Config::load(config_file).context("failed to load configuration")?;
    let output = resolved.show(format, section).map_err(|_| match section {
        Some(name) => anyhow::anyhow!("unknown config section '{name}'"),
        None => anyhow::anyhow!("failed to render configuration"),
    })?;
    println!("{output}");
    Ok(())
}

/// Print the config file locations checked during loading.
pub(crate) fn show_paths(config_file: Option<&Path>) {
    let explicit = config_file.map(|p| p.display().to_string());
    for path in ResolvedConfig::config_paths(explicit.as_deref()) {
        let marker = if Path::new(&path).is_file() { "found" } else { "missing" };
        println!("{path} ({marker})");
    }
}
