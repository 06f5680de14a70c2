//! Host site for running the plugin outside a propagation host.

use aether_core::{MessageSeverity, PluginSite, ScenarioWindow};
use tracing::{debug, error, info, warn};

/// Routes host messages to the log and serves a fixed scenario window.
#[derive(Debug, Clone)]
pub(crate) struct StandaloneSite {
    window: ScenarioWindow,
}

impl StandaloneSite {
    pub(crate) fn new(window: ScenarioWindow) -> Self {
        Self { window }
    }
}

impl PluginSite for StandaloneSite {
    fn message(&self, severity: MessageSeverity, message: &str) {
        match severity {
            MessageSeverity::Debug => debug!(target: "aether::host", "{message}"),
            MessageSeverity::Info | MessageSeverity::ForceInfo => {
                info!(target: "aether::host", "{message}");
            },
            MessageSeverity::Warning => warn!(target: "aether::host", "{message}"),
            MessageSeverity::Alarm => error!(target: "aether::host", "{message}"),
        }
    }

    fn scenario_window(&self) -> Option<ScenarioWindow> {
        Some(self.window.clone())
    }
}
