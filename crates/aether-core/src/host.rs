//! Host collaborator traits.
//!
//! The propagation host owns the plugin ABI. These traits are the narrow
//! surface a density plugin needs from it: a message channel, the current
//! scenario bounds, and the per-step evaluation object.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::ScenarioWindow;

/// Severity of a message sent through the host's message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSeverity {
    /// Diagnostic detail, usually hidden by the host.
    Debug,
    /// General information.
    Info,
    /// Something the user should look at.
    Warning,
    /// An error condition.
    Alarm,
    /// Information the host always displays.
    ForceInfo,
}

impl fmt::Display for MessageSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Alarm => "alarm",
            Self::ForceInfo => "force_info",
        };
        f.write_str(s)
    }
}

/// Services the host hands to a plugin at initialization.
pub trait PluginSite: Send + Sync {
    /// Send a message to the host's message viewer.
    fn message(&self, severity: MessageSeverity, message: &str);

    /// Current scenario start/stop, or `None` if no scenario is loaded.
    fn scenario_window(&self) -> Option<ScenarioWindow>;

    /// Set a host unit preference (e.g. `"DateFormat"` to `"ISO-YMD"`).
    ///
    /// # Errors
    ///
    /// Returns the host's reason when the preference is rejected.
    fn set_unit_preference(&self, _dimension: &str, _unit: &str) -> Result<(), String> {
        Ok(())
    }
}

/// The host's per-step evaluation object.
pub trait DensityEval {
    /// A date field formatted by the host (e.g. `"EpMin"`).
    fn date_string(&self, field: &str) -> String;

    /// Geodetic latitude (rad), longitude (rad) and altitude (m).
    fn lat_lon_alt(&self) -> (f64, f64, f64);

    /// Report the computed density in kg/m³.
    fn set_density(&mut self, density: f64);
}

/// Handle passed to the plugin during registration.
pub trait RegisterResult {
    /// Send a registration-time message.
    fn message(&self, severity: MessageSeverity, message: &str);
}
