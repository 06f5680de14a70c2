//! Post-merge configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges. Missing interpreter/script paths are not an error here:
//! the plugin's configuration verification reports them to the host.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_model(config)?;
    validate_plugin(config)?;
    validate_logging(config)?;
    Ok(())
}

/// Upper bound on a single model run (one hour).
const MAX_TIMEOUT_SECS: u64 = 3_600;

/// Upper bound on concurrent model processes.
const MAX_CONCURRENT_PROCESSES: usize = 64;

fn validate_model(config: &Config) -> ConfigResult<()> {
    let m = &config.model;

    if m.timeout_secs == 0 || m.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::ValidationError {
            field: "model.timeout_secs".to_owned(),
            message: format!("timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}"),
        });
    }

    if m.max_concurrent_processes == 0 || m.max_concurrent_processes > MAX_CONCURRENT_PROCESSES
    {
        return Err(ConfigError::ValidationError {
            field: "model.max_concurrent_processes".to_owned(),
            message: format!(
                "max_concurrent_processes must be between 1 and {MAX_CONCURRENT_PROCESSES}"
            ),
        });
    }

    for (field, value) in [
        ("model.interpreter", &m.interpreter),
        ("model.script", &m.script),
        ("model.working_dir", &m.working_dir),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                field: field.to_owned(),
                message: "must not be empty when set".to_owned(),
            });
        }
    }

    if let Some(key) = m.env.keys().find(|k| k.is_empty() || k.contains('=')) {
        return Err(ConfigError::ValidationError {
            field: "model.env".to_owned(),
            message: format!("invalid environment variable name '{key}'"),
        });
    }

    Ok(())
}

fn validate_plugin(config: &Config) -> ConfigResult<()> {
    let p = &config.plugin;

    if !matches!(p.failure_mode.as_str(), "fail_closed" | "fail_open") {
        return Err(ConfigError::ValidationError {
            field: "plugin.failure_mode".to_owned(),
            message: format!(
                "unsupported failure mode '{}'; expected one of: fail_closed, fail_open",
                p.failure_mode
            ),
        });
    }

    if !p.fail_open_density.is_finite() || p.fail_open_density < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "plugin.fail_open_density".to_owned(),
            message: "fail_open_density must be a finite non-negative number".to_owned(),
        });
    }

    if p.date_format.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "plugin.date_format".to_owned(),
            message: "date_format must not be empty".to_owned(),
        });
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !matches!(
        l.level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported level '{}'; expected one of: trace, debug, info, warn, error",
                l.level
            ),
        });
    }

    if !matches!(l.format.as_str(), "pretty" | "compact" | "json" | "full") {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported format '{}'; expected one of: pretty, compact, json, full",
                l.format
            ),
        });
    }

    match l.target.as_str() {
        "stderr" | "stdout" => {},
        "file" => {
            if l.file_dir.as_deref().is_none_or(|d| d.trim().is_empty()) {
                return Err(ConfigError::ValidationError {
                    field: "logging.file_dir".to_owned(),
                    message: "file_dir is required when target is \"file\"".to_owned(),
                });
            }
        },
        other => {
            return Err(ConfigError::ValidationError {
                field: "logging.target".to_owned(),
                message: format!(
                    "unsupported target '{other}'; expected one of: stderr, stdout, file"
                ),
            });
        },
    }

    if !matches!(l.rotation.as_str(), "daily" | "hourly" | "never") {
        return Err(ConfigError::ValidationError {
            field: "logging.rotation".to_owned(),
            message: format!(
                "unsupported rotation '{}'; expected one of: daily, hourly, never",
                l.rotation
            ),
        });
    }

    if l.file_prefix.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.file_prefix".to_owned(),
            message: "file_prefix must not be empty".to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.model.timeout_secs = 0;
        assert_eq!(field_of(validate(&config)), "model.timeout_secs");
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.model.max_concurrent_processes = 0;
        assert_eq!(field_of(validate(&config)), "model.max_concurrent_processes");
    }

    #[test]
    fn test_blank_script_rejected() {
        let mut config = Config::default();
        config.model.script = Some("   ".to_owned());
        assert_eq!(field_of(validate(&config)), "model.script");
    }

    #[test]
    fn test_bad_env_name_rejected() {
        let mut config = Config::default();
        config.model.env.insert("A=B".to_owned(), "x".to_owned());
        assert_eq!(field_of(validate(&config)), "model.env");
    }

    #[test]
    fn test_unknown_failure_mode_rejected() {
        let mut config = Config::default();
        config.plugin.failure_mode = "retry".to_owned();
        assert_eq!(field_of(validate(&config)), "plugin.failure_mode");
    }

    #[test]
    fn test_non_finite_fallback_rejected() {
        let mut config = Config::default();
        config.plugin.fail_open_density = f64::NAN;
        assert_eq!(field_of(validate(&config)), "plugin.fail_open_density");
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");
    }

    #[test]
    fn test_file_target_requires_dir() {
        let mut config = Config::default();
        config.logging.target = "file".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.file_dir");

        config.logging.file_dir = Some("/var/log/aether".to_owned());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_log_target_rejected() {
        let mut config = Config::default();
        config.logging.target = "syslog".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.target");
    }

    #[test]
    fn test_unknown_rotation_rejected() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.rotation");
    }
}
