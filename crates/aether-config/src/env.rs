//! Environment variable fallback and `${VAR}` reference resolution.
//!
//! Env vars fill fields that no config file set. A file value always wins
//! over the environment; the environment always wins over embedded defaults.

use std::collections::HashMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `AETHER_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "AETHER_MODEL_INTERPRETER",
        field_path: "model.interpreter",
    },
    EnvMapping {
        var_name: "AETHER_MODEL_SCRIPT",
        field_path: "model.script",
    },
    EnvMapping {
        var_name: "AETHER_MODEL_TIMEOUT_SECS",
        field_path: "model.timeout_secs",
    },
    EnvMapping {
        var_name: "AETHER_MODEL_MAX_CONCURRENT",
        field_path: "model.max_concurrent_processes",
    },
    EnvMapping {
        var_name: "AETHER_MODEL_WORKING_DIR",
        field_path: "model.working_dir",
    },
    EnvMapping {
        var_name: "AETHER_MODEL_SANDBOXED",
        field_path: "model.sandboxed",
    },
    EnvMapping {
        var_name: "AETHER_PLUGIN_DEBUG",
        field_path: "plugin.debug",
    },
    EnvMapping {
        var_name: "AETHER_FAILURE_MODE",
        field_path: "plugin.failure_mode",
    },
    EnvMapping {
        var_name: "AETHER_LOG_LEVEL",
        field_path: "logging.level",
    },
];

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let set_by_file = sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            set_field_from_string(merged, mapping.field_path, val);
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Resolve `${VAR}` references within string values in the config tree.
///
/// Only string values are processed. References that don't resolve are left
/// as-is.
pub fn resolve_env_references<S: ::std::hash::BuildHasher>(
    val: &mut toml::Value,
    env_vars: &HashMap<String, String, S>,
) {
    match val {
        toml::Value::String(s) => {
            *s = resolve_string_refs(s, env_vars);
        },
        toml::Value::Table(table) => {
            let keys: Vec<String> = table.keys().cloned().collect();
            for key in keys {
                if let Some(child) = table.get_mut(&key) {
                    resolve_env_references(child, env_vars);
                }
            }
        },
        toml::Value::Array(arr) => {
            for child in arr.iter_mut() {
                resolve_env_references(child, env_vars);
            }
        },
        _ => {},
    }
}

/// Replace `${VAR}` references in a string with their env var values.
fn resolve_string_refs<S: ::std::hash::BuildHasher>(
    input: &str,
    env_vars: &HashMap<String, String, S>,
) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;

            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                var_name.push(ch);
            }

            if closed && !var_name.is_empty() {
                if let Some(val) = env_vars.get(&var_name) {
                    result.push_str(val);
                } else {
                    debug!(var = var_name, "unresolved env var reference in config");
                    let _ = write!(result, "${{{var_name}}}");
                }
            } else {
                // Malformed reference, leave as-is.
                result.push_str("${");
                result.push_str(&var_name);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Set a field in the TOML tree from a string value, creating intermediate
/// tables as needed.
fn set_field_from_string(root: &mut toml::Value, path: &str, val: &str) {
    let toml_val = coerce_to_toml_value(path, val);

    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = root;
    for segment in segments {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        if !table.contains_key(segment) {
            table.insert(
                segment.to_owned(),
                toml::Value::Table(toml::map::Map::new()),
            );
        }
        let Some(next) = table.get_mut(segment) else {
            return;
        };
        current = next;
    }

    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), toml_val);
    }
}

/// Coerce a string env var value to the TOML type of its field.
fn coerce_to_toml_value(path: &str, val: &str) -> toml::Value {
    if matches!(
        path,
        "model.timeout_secs" | "model.max_concurrent_processes"
    ) && let Ok(i) = val.parse::<i64>()
    {
        return toml::Value::Integer(i);
    }

    if matches!(path, "model.sandboxed" | "plugin.debug")
        && let Ok(b) = val.parse::<bool>()
    {
        return toml::Value::Boolean(b);
    }

    toml::Value::String(val.to_owned())
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_apply_env_fallbacks_fills_unset_field() {
        let mut merged: toml::Value = toml::from_str("[model]\ntimeout_secs = 60").unwrap();
        let mut sources = FieldSources::new();
        let env = make_env(&[("AETHER_MODEL_SCRIPT", "/opt/wam/read_density.py")]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 1);
        assert_eq!(
            merged["model"]["script"].as_str().unwrap(),
            "/opt/wam/read_density.py"
        );
        assert_eq!(sources.get("model.script"), Some(&ConfigLayer::Environment));
    }

    #[test]
    fn test_env_fallback_overrides_defaults() {
        let mut merged: toml::Value = toml::from_str("[model]\ntimeout_secs = 60").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("model.timeout_secs".to_owned(), ConfigLayer::Defaults);
        let env = make_env(&[("AETHER_MODEL_TIMEOUT_SECS", "15")]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 1);
        assert_eq!(merged["model"]["timeout_secs"].as_integer(), Some(15));
    }

    #[test]
    fn test_env_fallback_skips_file_values() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);

        let env = make_env(&[("AETHER_LOG_LEVEL", "debug")]);
        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 0);
        assert_eq!(merged["logging"]["level"].as_str().unwrap(), "warn");
    }

    #[test]
    fn test_resolve_env_references() {
        let mut val: toml::Value =
            toml::from_str("[model]\nscript = \"${MODEL_HOME}/read_density.py\"").unwrap();
        let env = make_env(&[("MODEL_HOME", "/opt/wam")]);
        resolve_env_references(&mut val, &env);

        assert_eq!(
            val["model"]["script"].as_str().unwrap(),
            "/opt/wam/read_density.py"
        );
    }

    #[test]
    fn test_resolve_env_references_unresolved() {
        let mut val: toml::Value =
            toml::from_str("[model]\nscript = \"${MISSING_VAR}\"").unwrap();
        resolve_env_references(&mut val, &HashMap::new());

        assert_eq!(val["model"]["script"].as_str().unwrap(), "${MISSING_VAR}");
    }

    #[test]
    fn test_coerce_types() {
        assert_eq!(
            coerce_to_toml_value("model.timeout_secs", "30").as_integer(),
            Some(30)
        );
        assert_eq!(coerce_to_toml_value("plugin.debug", "true").as_bool(), Some(true));
        assert_eq!(
            coerce_to_toml_value("model.timeout_secs", "soon").as_str(),
            Some("soon")
        );
    }

    #[test]
    fn test_set_field_creates_tables() {
        let mut root = toml::Value::Table(toml::map::Map::new());
        set_field_from_string(&mut root, "plugin.failure_mode", "fail_open");
        assert_eq!(root["plugin"]["failure_mode"].as_str(), Some("fail_open"));
    }
}
