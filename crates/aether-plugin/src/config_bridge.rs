//! Bridge from `aether_config::Config` to plugin and bridge types.
//!
//! The config crate has no dependencies on other internal crates. The
//! plugin and the CLI both convert through this module so the mapping lives
//! in one place.

use std::path::PathBuf;
use std::time::Duration;

use aether_bridge::BridgeConfig;
use aether_config::Config;
use aether_telemetry::{FileRotation, LogConfig, LogFormat, LogTarget};

use crate::error::{PluginError, PluginResult};
use crate::policy::FailurePolicy;

/// Host-adapter settings taken from the `[plugin]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginSettings {
    /// Send lifecycle debug messages to the host.
    pub debug: bool,
    /// Host `DateFormat` unit applied at init.
    pub date_format: String,
    /// What to report when an evaluation fails.
    pub failure_policy: FailurePolicy,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            debug: false,
            date_format: "ISO-YMD".to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Convert config to [`BridgeConfig`].
///
/// # Errors
///
/// Returns [`PluginError::ConfigurationInvalid`] if the interpreter or the
/// script is not configured.
pub fn to_bridge_config(cfg: &Config) -> PluginResult<BridgeConfig> {
    let interpreter = cfg.model.interpreter.as_deref().ok_or_else(|| {
        PluginError::ConfigurationInvalid(
            "model.interpreter is not set (or AETHER_MODEL_INTERPRETER)".to_string(),
        )
    })?;
    let script = cfg.model.script.as_deref().ok_or_else(|| {
        PluginError::ConfigurationInvalid(
            "model.script is not set (or AETHER_MODEL_SCRIPT)".to_string(),
        )
    })?;

    let mut bridge = BridgeConfig::new(interpreter, script)
        .with_timeout(Duration::from_secs(cfg.model.timeout_secs))
        .with_max_concurrent_processes(cfg.model.max_concurrent_processes);
    bridge.working_dir = cfg.model.working_dir.as_ref().map(PathBuf::from);
    bridge.env.clone_from(&cfg.model.env);
    bridge.sandboxed = cfg.model.sandboxed;

    Ok(bridge)
}

/// Convert config to [`PluginSettings`].
///
/// # Errors
///
/// Returns [`PluginError::ConfigurationInvalid`] for an unknown failure mode.
pub fn to_plugin_settings(cfg: &Config) -> PluginResult<PluginSettings> {
    Ok(PluginSettings {
        debug: cfg.plugin.debug,
        date_format: cfg.plugin.date_format.clone(),
        failure_policy: FailurePolicy::from_config(
            &cfg.plugin.failure_mode,
            cfg.plugin.fail_open_density,
        )?,
    })
}

/// Convert config to [`LogConfig`].
#[must_use]
pub fn to_log_config(cfg: &Config) -> LogConfig {
    let logging = &cfg.logging;
    let mut log_config =
        LogConfig::new(&logging.level).with_format(LogFormat::from_config(&logging.format));

    log_config = match (logging.target.as_str(), logging.file_dir.as_deref()) {
        ("stdout", _) => log_config.with_target(LogTarget::Stdout),
        ("file", Some(dir)) => log_config.with_file_logging(
            dir,
            &logging.file_prefix,
            FileRotation::from_config(&logging.rotation),
        ),
        _ => log_config.with_target(LogTarget::Stderr),
    };

    if !logging.timestamps {
        log_config = log_config.without_timestamps();
    }
    if logging.file_info {
        log_config = log_config.with_file_info();
    }
    if logging.span_events {
        log_config = log_config.with_span_events();
    }

    for directive in &logging.directives {
        log_config = log_config.with_directive(directive);
    }

    log_config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut cfg = Config::default();
        cfg.model.interpreter = Some("/usr/bin/python3".to_string());
        cfg.model.script = Some("/opt/wam/read_density.py".to_string());
        cfg
    }

    #[test]
    fn test_bridge_config_requires_interpreter() {
        let mut cfg = configured();
        cfg.model.interpreter = None;
        let err = to_bridge_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("model.interpreter"));
    }

    #[test]
    fn test_bridge_config_requires_script() {
        let mut cfg = configured();
        cfg.model.script = None;
        assert!(matches!(
            to_bridge_config(&cfg),
            Err(PluginError::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn test_bridge_config_mapping() {
        let mut cfg = configured();
        cfg.model.timeout_secs = 15;
        cfg.model.max_concurrent_processes = 4;
        cfg.model.working_dir = Some("/var/lib/wam".to_string());
        cfg.model.sandboxed = true;
        cfg.model
            .env
            .insert("WAM_DATA_DIR".to_string(), "/data".to_string());

        let bridge = to_bridge_config(&cfg).unwrap();
        assert_eq!(bridge.interpreter, PathBuf::from("/usr/bin/python3"));
        assert_eq!(bridge.script, PathBuf::from("/opt/wam/read_density.py"));
        assert_eq!(bridge.timeout, Duration::from_secs(15));
        assert_eq!(bridge.max_concurrent_processes, 4);
        assert_eq!(bridge.working_dir, Some(PathBuf::from("/var/lib/wam")));
        assert!(bridge.sandboxed);
        assert_eq!(bridge.env.get("WAM_DATA_DIR").map(String::as_str), Some("/data"));
    }

    #[test]
    fn test_plugin_settings() {
        let mut cfg = configured();
        cfg.plugin.debug = true;
        cfg.plugin.failure_mode = "fail_open".to_string();
        cfg.plugin.fail_open_density = 1e-12;

        let settings = to_plugin_settings(&cfg).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.date_format, "ISO-YMD");
        assert_eq!(settings.failure_policy.mode(), "fail_open");
    }

    #[test]
    fn test_log_config() {
        let mut cfg = Config::default();
        cfg.logging.level = "debug".to_string();
        cfg.logging.format = "json".to_string();
        cfg.logging.directives = vec!["aether_bridge=trace".to_string()];

        let log = to_log_config(&cfg);
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Json);
        assert_eq!(log.directives, vec!["aether_bridge=trace"]);
        assert_eq!(log.target, LogTarget::Stderr);
        assert!(log.timestamps);
        assert!(!log.span_events);
    }

    #[test]
    fn test_log_config_file_target() {
        let mut cfg = Config::default();
        cfg.logging.target = "file".to_string();
        cfg.logging.file_dir = Some("/var/log/aether".to_string());
        cfg.logging.file_prefix = "density".to_string();
        cfg.logging.rotation = "hourly".to_string();
        cfg.logging.timestamps = false;
        cfg.logging.file_info = true;
        cfg.logging.span_events = true;

        let log = to_log_config(&cfg);
        assert_eq!(log.target, LogTarget::File(PathBuf::from("/var/log/aether")));
        assert_eq!(log.file.prefix, "density");
        assert_eq!(log.file.rotation, FileRotation::Hourly);
        assert!(!log.ansi);
        assert!(!log.timestamps);
        assert!(log.file_info);
        assert!(log.span_events);
    }

    #[test]
    fn test_log_config_stdout_target() {
        let mut cfg = Config::default();
        cfg.logging.target = "stdout".to_string();
        assert_eq!(to_log_config(&cfg).target, LogTarget::Stdout);
    }
}
