//! Configuration types for Aether.
//!
//! All types in this module are self-contained with no dependencies on other
//! internal aether crates. Every struct implements [`Default`] matching
//! `defaults.toml`, so a bare `[section]` header in TOML produces a working
//! configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External density model invocation.
    pub model: ModelSection,
    /// Host adapter behaviour.
    pub plugin: PluginSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// ModelSection
// ---------------------------------------------------------------------------

/// How to launch the external density model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    /// Interpreter executable (absolute path, or a name resolved on `PATH`).
    pub interpreter: Option<String>,
    /// Model script passed as the interpreter's first argument.
    pub script: Option<String>,
    /// Wall-clock limit for one model process.
    pub timeout_secs: u64,
    /// Maximum number of model processes running at once.
    pub max_concurrent_processes: usize,
    /// Working directory for the model process.
    pub working_dir: Option<String>,
    /// Clear the inherited environment, keeping only a small allowlist.
    pub sandboxed: bool,
    /// Extra environment variables for the model process.
    pub env: HashMap<String, String>,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            interpreter: None,
            script: None,
            timeout_secs: 60,
            max_concurrent_processes: 1,
            working_dir: None,
            sandboxed: false,
            env: HashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// PluginSection
// ---------------------------------------------------------------------------

/// Host adapter policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSection {
    /// Send lifecycle debug messages to the host message channel.
    pub debug: bool,
    /// Host `DateFormat` unit applied at init. The model parses ISO dates.
    pub date_format: String,
    /// `"fail_closed"` surfaces model failures; `"fail_open"` substitutes
    /// `fail_open_density` after logging.
    pub failure_mode: String,
    /// Density (kg/m³) reported on failure in `fail_open` mode.
    pub fail_open_density: f64,
}

impl Default for PluginSection {
    fn default() -> Self {
        Self {
            debug: false,
            date_format: "ISO-YMD".to_owned(),
            failure_mode: "fail_closed".to_owned(),
            fail_open_density: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct LoggingSection {
    /// Level filter: `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
    /// Output format: `pretty`, `compact`, `json`, `full`.
    pub format: String,
    /// Where logs go: `stderr`, `stdout` or `file`.
    pub target: String,
    /// Directory for rolling log files. Required when `target = "file"`.
    pub file_dir: Option<String>,
    /// Log file name prefix.
    pub file_prefix: String,
    /// File rotation: `daily`, `hourly`, `never`.
    pub rotation: String,
    /// Include timestamps.
    pub timestamps: bool,
    /// Include source file and line.
    pub file_info: bool,
    /// Emit span open/close events.
    pub span_events: bool,
    /// Extra `EnvFilter` directives (e.g. `aether_bridge=trace`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            target: "stderr".to_owned(),
            file_dir: None,
            file_prefix: "aether".to_owned(),
            rotation: "daily".to_owned(),
            timestamps: true,
            file_info: false,
            span_events: false,
            directives: Vec::new(),
        }
    }
}
