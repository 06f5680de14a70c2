//! Aether CLI - standalone host for the external density model.
//!
//! Loads the layered configuration, stands in for a propagation host and
//! drives the density plugin: single evaluations, JSON-lines batches,
//! configuration checks and capability listings.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use aether_core::ScenarioWindow;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod site;

use commands::{OutputFormat, batch, capabilities, config, evaluate, load_config, verify};

/// Aether - external atmospheric density model bridge
#[derive(Parser)]
#[command(name = "aether")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty (default) or json
    #[arg(long, global = true, default_value = "pretty")]
    format: String,

    /// Path to an explicit configuration file
    #[arg(short, long, global = true, env = "AETHER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct WindowArgs {
    /// Scenario start time, as the model expects it
    #[arg(long)]
    start: String,

    /// Scenario stop time, as the model expects it
    #[arg(long)]
    stop: String,
}

impl WindowArgs {
    fn into_window(self) -> ScenarioWindow {
        ScenarioWindow::new(self.start, self.stop)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate density for one position and epoch
    Evaluate {
        /// Epoch string passed to the model
        #[arg(long)]
        epoch: String,

        /// Geodetic latitude (radians, or degrees with --degrees)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude (radians, or degrees with --degrees)
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Altitude in meters
        #[arg(long)]
        alt: f64,

        /// Interpret --lat and --lon as degrees
        #[arg(long)]
        degrees: bool,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Evaluate a JSON-lines file of queries
    Batch {
        /// Input file, one query object per line
        input: PathBuf,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Check that the model interpreter and script are usable
    Verify,

    /// Print the plugin's capability declarations
    Capabilities,

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Rendering (toml or json)
        #[arg(short, long, default_value = "toml")]
        output: String,
        /// Show only a specific section (model, plugin, logging)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Show config file paths being checked
    Paths,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load unified config for logging setup.
    let unified_cfg = aether_config::Config::load(cli.config.as_deref())
        .ok()
        .map(|r| r.config);

    // Set up logging from config, with --verbose override.
    let logging = match &unified_cfg {
        Some(cfg) => {
            let mut lc = aether_plugin::config_bridge::to_log_config(cfg);
            if cli.verbose {
                "debug".clone_into(&mut lc.level);
            }
            aether_telemetry::setup_logging(&lc)
        },
        // Fallback if config loading fails.
        None if cli.verbose => aether_telemetry::setup_logging(
            &aether_telemetry::LogConfig::new("debug")
                .with_format(aether_telemetry::LogFormat::Compact),
        ),
        None => aether_telemetry::setup_default_logging(),
    };
    if let Err(e) = logging {
        eprintln!("Failed to initialize logging: {e}");
    }

    let output_format = match cli.format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Pretty,
    };

    match cli.command {
        Commands::Evaluate {
            epoch,
            lat,
            lon,
            alt,
            degrees,
            window,
        } => {
            let cfg = load_config(cli.config.as_deref())?;
            let position = evaluate::Position {
                latitude: lat,
                longitude: lon,
                altitude_m: alt,
                degrees,
            };
            evaluate::run_evaluate(&cfg, &epoch, position, window.into_window(), output_format)?;
        },
        Commands::Batch { input, window } => {
            let cfg = load_config(cli.config.as_deref())?;
            batch::run_batch(&cfg, &input, window.into_window())?;
        },
        Commands::Verify => {
            let cfg = load_config(cli.config.as_deref())?;
            verify::run_verify(&cfg, output_format)?;
        },
        Commands::Capabilities => capabilities::show_capabilities(output_format)?,
        Commands::Config { command } => match command {
            ConfigCommands::Show { output, section } => {
                config::show_config(cli.config.as_deref(), &output, section.as_deref())?;
            },
            ConfigCommands::Paths => config::show_paths(cli.config.as_deref()),
        },
    }

    Ok(())
}
