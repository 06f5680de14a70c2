//! `aether verify` - check the model configuration.

use aether_config::Config;
use aether_plugin::DensityPlugin;
use anyhow::{Context, Result};

use super::OutputFormat;

/// Verify the interpreter and script and print the outcome.
pub(crate) fn run_verify(cfg: &Config, format: OutputFormat) -> Result<()> {
    let plugin = DensityPlugin::from_config(cfg).context("failed to create density plugin")?;
    let result = plugin.verify_plugin_config();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&result)?),
        OutputFormat::Pretty => {
            let view = plugin.plugin_config();
            println!("interpreter: {}", view.interpreter);
            println!("script:      {}", view.script);
            println!("timeout:     {}s", view.timeout_secs);
            println!("result:      {}", result.message);
        },
    }

    if !result.result {
        anyhow::bail!("configuration invalid: {}", result.message);
    }
    Ok(())
}
