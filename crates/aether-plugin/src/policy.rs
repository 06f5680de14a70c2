//! What the plugin reports to the host when an evaluation fails.

use aether_core::Density;
use serde::Serialize;

use crate::error::{PluginError, PluginResult};

/// Failure policy for density evaluations.
///
/// `NotInitialized` is always surfaced, whatever the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum FailurePolicy {
    /// Surface the error to the host.
    #[default]
    FailClosed,
    /// Log the error to the host and report `fallback` as the density.
    FailOpen {
        /// Density reported in place of a failed evaluation.
        fallback: Density,
    },
}

impl FailurePolicy {
    /// Build a policy from its config name.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ConfigurationInvalid`] for an unknown mode.
    pub fn from_config(mode: &str, fallback: f64) -> PluginResult<Self> {
        match mode {
            "fail_closed" => Ok(Self::FailClosed),
            "fail_open" => Ok(Self::FailOpen {
                fallback: Density::from_kg_per_m3(fallback),
            }),
            other => Err(PluginError::ConfigurationInvalid(format!(
                "unknown failure mode '{other}'"
            ))),
        }
    }

    /// Config name of this policy.
    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            Self::FailClosed => "fail_closed",
            Self::FailOpen { .. } => "fail_open",
        }
    }
}
