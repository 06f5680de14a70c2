//! The density plugin: host lifecycle, evaluation and config verification.

use std::sync::{Arc, RwLock};

use aether_bridge::{BridgeConfig, DensityBridge};
use aether_config::Config;
use aether_core::{
    Density, DensityEval, DensityQuery, MessageSeverity, PluginSite, RegisterResult,
    ScenarioWindow,
};
use aether_telemetry::EvaluationContext;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::{Instrument, debug, error, info, warn};

use crate::capabilities::{DensityModel, PROG_ID};
use crate::config_bridge::{PluginSettings, to_bridge_config, to_plugin_settings};
use crate::error::{PluginError, PluginResult};
use crate::policy::FailurePolicy;
use crate::verify::{ConfigVerifyResult, PluginConfigView, verify_bridge_config};

/// Host unit dimension for date strings.
const DATE_FORMAT_DIMENSION: &str = "DateFormat";

/// The lifecycle state of the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// Constructed; `init` not yet called.
    Uninitialized,
    /// Holding a host site and ready to evaluate.
    Initialized,
    /// Released by the host.
    Freed,
}

enum Lifecycle {
    Uninitialized,
    Initialized(Arc<dyn PluginSite>),
    Freed,
}

/// Density model plugin backed by an external model process.
///
/// All host calls are synchronous. Each evaluation blocks the calling
/// thread for one model process lifetime, bounded by the bridge timeout.
pub struct DensityPlugin {
    bridge: DensityBridge,
    settings: PluginSettings,
    lifecycle: RwLock<Lifecycle>,
    runtime: Runtime,
}

impl std::fmt::Debug for DensityPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DensityPlugin")
            .field("bridge", &self.bridge)
            .field("settings", &self.settings)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl DensityModel for DensityPlugin {}

impl DensityPlugin {
    /// Create a plugin around `bridge`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Runtime`] if the async runtime cannot be built.
    pub fn new(bridge: DensityBridge, settings: PluginSettings) -> PluginResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PluginError::Runtime(e.to_string()))?;

        Ok(Self {
            bridge,
            settings,
            lifecycle: RwLock::new(Lifecycle::Uninitialized),
            runtime,
        })
    }

    /// Create a plugin from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ConfigurationInvalid`] if the model is not
    /// configured, or [`PluginError::Runtime`] if the runtime cannot start.
    pub fn from_config(cfg: &Config) -> PluginResult<Self> {
        let bridge = DensityBridge::new(to_bridge_config(cfg)?);
        Self::new(bridge, to_plugin_settings(cfg)?)
    }

    /// The bridge configuration in use.
    #[must_use]
    pub fn bridge_config(&self) -> &BridgeConfig {
        self.bridge.config()
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PluginState {
        match self.lifecycle.read().as_deref() {
            Ok(Lifecycle::Initialized(_)) => PluginState::Initialized,
            Ok(Lifecycle::Freed) => PluginState::Freed,
            Ok(Lifecycle::Uninitialized) | Err(_) => PluginState::Uninitialized,
        }
    }

    /// Called once when the host registers the plugin.
    pub fn register(&self, result: &dyn RegisterResult) {
        debug!(prog_id = PROG_ID, "plugin registered");
        if self.settings.debug {
            result.message(MessageSeverity::Debug, &format!("{PROG_ID}:Register()"));
        }
    }

    /// Attach the host site.
    ///
    /// Calling again replaces the stored site. The configured date format is
    /// requested from the host so epochs and scenario bounds arrive without
    /// embedded spaces.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Runtime`] if the lifecycle lock is poisoned.
    pub fn init(&self, site: Arc<dyn PluginSite>) -> PluginResult<()> {
        if let Err(reason) =
            site.set_unit_preference(DATE_FORMAT_DIMENSION, &self.settings.date_format)
        {
            warn!(
                date_format = %self.settings.date_format,
                reason = %reason,
                "host rejected date format"
            );
            site.message(
                MessageSeverity::Warning,
                &format!(
                    "{PROG_ID}: could not set {DATE_FORMAT_DIMENSION} to {}: {reason}",
                    self.settings.date_format
                ),
            );
        }

        if self.settings.debug {
            site.message(MessageSeverity::Debug, &format!("{PROG_ID}:Init()"));
        }

        let mut lifecycle = self
            .lifecycle
            .write()
            .map_err(|_| PluginError::Runtime("plugin state lock poisoned".to_string()))?;
        *lifecycle = Lifecycle::Initialized(site);

        info!(
            interpreter = %self.bridge.config().interpreter.display(),
            script = %self.bridge.config().script.display(),
            "plugin initialized"
        );
        Ok(())
    }

    /// Release the host site. Safe to call in any state.
    pub fn free(&self) {
        let Ok(mut lifecycle) = self.lifecycle.write() else {
            return;
        };

        match std::mem::replace(&mut *lifecycle, Lifecycle::Freed) {
            Lifecycle::Initialized(site) => {
                if self.settings.debug {
                    site.message(MessageSeverity::Debug, &format!("{PROG_ID}:Free()"));
                }
                info!("plugin freed");
            },
            // Nothing to release.
            previous => *lifecycle = previous,
        }
    }

    /// Evaluate density for the host's current step.
    ///
    /// Reads the query from `eval`, writes the density back on success and
    /// returns it.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotInitialized`] outside the initialized
    /// state, without spawning a process. Other failures follow the
    /// configured [`FailurePolicy`].
    pub fn evaluate(&self, eval: &mut dyn DensityEval) -> PluginResult<Density> {
        let query = DensityQuery::from_eval(eval);
        let density = self.evaluate_query(&query)?;
        eval.set_density(density.kg_per_m3());
        Ok(density)
    }

    /// Evaluate density for `query` without a host eval object.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub fn evaluate_query(&self, query: &DensityQuery) -> PluginResult<Density> {
        let site = self.site()?;
        let ctx = EvaluationContext::new("plugin").with_epoch(query.epoch.clone());
        let span = ctx.span();

        let result = span.in_scope(|| scenario_window(site.as_ref())).and_then(|window| {
            self.runtime
                .block_on(self.bridge.compute(query, &window).instrument(span.clone()))
                .map_err(PluginError::from)
        });

        let _guard = span.enter();
        match result {
            Ok(density) => {
                debug!(
                    density = density.kg_per_m3(),
                    elapsed_ms = ctx.elapsed_ms(),
                    "evaluation complete"
                );
                Ok(density)
            },
            Err(e) => self.handle_failure(site.as_ref(), e),
        }
    }

    /// Evaluate many queries against the current scenario.
    ///
    /// Up to `max_concurrent_processes` model processes run at once;
    /// results keep the order of `queries`. The failure policy applies to
    /// each query individually.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotInitialized`] outside the initialized
    /// state, or [`PluginError::ScenarioUnavailable`] (under fail-closed)
    /// if the host has no scenario loaded.
    pub fn evaluate_batch(
        &self,
        queries: &[DensityQuery],
    ) -> PluginResult<Vec<PluginResult<Density>>> {
        let site = self.site()?;
        let window = match scenario_window(site.as_ref()) {
            Ok(window) => window,
            Err(e) => {
                let fallback = self.handle_failure(site.as_ref(), e)?;
                return Ok(queries.iter().map(|_| Ok(fallback)).collect());
            },
        };

        let span = EvaluationContext::new("plugin-batch").span();
        let results = self
            .runtime
            .block_on(self.bridge.compute_batch(queries, &window).instrument(span));

        Ok(results
            .into_iter()
            .map(|r| r.or_else(|e| self.handle_failure(site.as_ref(), e.into())))
            .collect())
    }

    /// The effective configuration.
    #[must_use]
    pub fn plugin_config(&self) -> PluginConfigView {
        PluginConfigView::new(self.bridge.config(), &self.settings)
    }

    /// Check the configuration and report the outcome to the host.
    #[must_use]
    pub fn verify_plugin_config(&self) -> ConfigVerifyResult {
        let result = verify_bridge_config(self.bridge.config());

        if let Some(site) = self.current_site() {
            site.message(MessageSeverity::Debug, &format!("{PROG_ID}:VerifyPluginConfig()"));
            if !result.result {
                site.message(MessageSeverity::Alarm, &format!("{PROG_ID}: {}", result.message));
            }
        }

        if result.result {
            debug!("plugin configuration verified");
        } else {
            warn!(reason = %result.message, "plugin configuration invalid");
        }
        result
    }

    fn current_site(&self) -> Option<Arc<dyn PluginSite>> {
        match &*self.lifecycle.read().ok()? {
            Lifecycle::Initialized(site) => Some(Arc::clone(site)),
            Lifecycle::Uninitialized | Lifecycle::Freed => None,
        }
    }

    fn site(&self) -> PluginResult<Arc<dyn PluginSite>> {
        self.current_site().ok_or_else(|| {
            warn!(state = ?self.state(), "evaluation requested before init");
            PluginError::NotInitialized
        })
    }

    fn handle_failure(&self, site: &dyn PluginSite, err: PluginError) -> PluginResult<Density> {
        error!(error = %err, "density evaluation failed");
        site.message(
            MessageSeverity::Alarm,
            &format!("{PROG_ID}: density evaluation failed: {err}"),
        );

        match self.settings.failure_policy {
            FailurePolicy::FailClosed => Err(err),
            FailurePolicy::FailOpen { fallback } => {
                warn!(fallback = fallback.kg_per_m3(), "reporting fallback density");
                site.message(
                    MessageSeverity::Warning,
                    &format!("{PROG_ID}: reporting fallback density {fallback}"),
                );
                Ok(fallback)
            },
        }
    }
}

fn scenario_window(site: &dyn PluginSite) -> PluginResult<ScenarioWindow> {
    site.scenario_window().ok_or(PluginError::ScenarioUnavailable)
}

#[cfg(test)]
mod tests {
    use aether_bridge::{BridgeError, ProcessOutput};
    use aether_core::EPOCH_FIELD;
    use aether_test::{
        MockEval, MockRegister, MockSite, RecordingRunner, test_bridge_config, test_query,
    };

    use super::*;

    fn plugin_with(runner: &Arc<RecordingRunner>, settings: PluginSettings) -> DensityPlugin {
        let bridge = DensityBridge::with_runner(test_bridge_config(), runner.clone());
        DensityPlugin::new(bridge, settings).unwrap()
    }

    fn fail_open(fallback: f64) -> PluginSettings {
        PluginSettings {
            failure_policy: FailurePolicy::FailOpen {
                fallback: Density::from_kg_per_m3(fallback),
            },
            ..PluginSettings::default()
        }
    }

    fn debug_settings() -> PluginSettings {
        PluginSettings {
            debug: true,
            ..PluginSettings::default()
        }
    }

    #[test]
    fn test_evaluate_before_init_does_not_spawn() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, PluginSettings::default());
        let mut eval = MockEval::new("1440", 0.0, 0.0, 400_000.0);

        let err = plugin.evaluate(&mut eval).unwrap_err();

        assert!(matches!(err, PluginError::NotInitialized));
        assert_eq!(runner.spawn_count(), 0);
        assert!(eval.density.is_none());
    }

    #[test]
    fn test_not_initialized_is_never_swallowed() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, fail_open(1e-12));

        assert!(matches!(
            plugin.evaluate_query(&test_query()),
            Err(PluginError::NotInitialized)
        ));
        assert_eq!(runner.spawn_count(), 0);
    }

    #[test]
    fn test_evaluate_writes_density() {
        let runner = Arc::new(RecordingRunner::new().with_stdout("3.5e-12\n"));
        let plugin = plugin_with(&runner, PluginSettings::default());
        plugin.init(Arc::new(MockSite::new())).unwrap();
        let mut eval = MockEval::new("1440", 0.0, 0.0, 400_000.0);

        let density = plugin.evaluate(&mut eval).unwrap();

        assert_eq!(density.kg_per_m3(), 3.5e-12);
        assert_eq!(eval.density, Some(3.5e-12));
        assert_eq!(eval.requested_fields(), vec![EPOCH_FIELD.to_string()]);
        assert_eq!(runner.spawn_count(), 1);
    }

    #[test]
    fn test_init_sets_date_format() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, PluginSettings::default());
        let site = MockSite::new();

        plugin.init(Arc::new(site.clone())).unwrap();

        assert_eq!(
            site.unit_preferences(),
            vec![("DateFormat".to_string(), "ISO-YMD".to_string())]
        );
        assert_eq!(plugin.state(), PluginState::Initialized);
    }

    #[test]
    fn test_rejected_date_format_is_reported() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, PluginSettings::default());
        let site = MockSite::new().rejecting_unit_preferences();

        plugin.init(Arc::new(site.clone())).unwrap();

        assert_eq!(plugin.state(), PluginState::Initialized);
        assert_eq!(site.messages_with(MessageSeverity::Warning).len(), 1);
    }

    #[test]
    fn test_init_twice_uses_latest_site() {
        let runner = Arc::new(RecordingRunner::new().with_stdout("abc"));
        let plugin = plugin_with(&runner, PluginSettings::default());
        let first = MockSite::new();
        let second = MockSite::new();

        plugin.init(Arc::new(first.clone())).unwrap();
        plugin.init(Arc::new(second.clone())).unwrap();
        assert_eq!(plugin.state(), PluginState::Initialized);

        plugin.evaluate_query(&test_query()).unwrap_err();
        assert!(first.messages_with(MessageSeverity::Alarm).is_empty());
        assert_eq!(second.messages_with(MessageSeverity::Alarm).len(), 1);
    }

    #[test]
    fn test_free_before_init_is_noop() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, PluginSettings::default());

        plugin.free();

        assert_eq!(plugin.state(), PluginState::Uninitialized);
    }

    #[test]
    fn test_free_then_evaluate() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, debug_settings());
        let site = MockSite::new();
        plugin.init(Arc::new(site.clone())).unwrap();

        plugin.free();
        plugin.free();

        assert_eq!(plugin.state(), PluginState::Freed);
        assert!(matches!(
            plugin.evaluate_query(&test_query()),
            Err(PluginError::NotInitialized)
        ));
        assert_eq!(runner.spawn_count(), 0);
        let debug = site.messages_with(MessageSeverity::Debug);
        assert_eq!(debug, vec!["Python.Density.HPOP:Init()", "Python.Density.HPOP:Free()"]);
    }

    #[test]
    fn test_register_debug_message() {
        let runner = Arc::new(RecordingRunner::new());
        let quiet = MockRegister::new();
        plugin_with(&runner, PluginSettings::default()).register(&quiet);
        assert!(quiet.messages().is_empty());

        let chatty = MockRegister::new();
        plugin_with(&runner, debug_settings()).register(&chatty);
        assert_eq!(
            chatty.messages(),
            vec![(MessageSeverity::Debug, "Python.Density.HPOP:Register()".to_string())]
        );
    }

    #[test]
    fn test_lowest_valid_altitude_in_every_state() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, PluginSettings::default());
        assert_eq!(plugin.lowest_valid_altitude(), 90_000.0);
        plugin.init(Arc::new(MockSite::new())).unwrap();
        assert_eq!(plugin.lowest_valid_altitude(), 90_000.0);
        plugin.free();
        assert_eq!(plugin.lowest_valid_altitude(), 90_000.0);
    }

    #[test]
    fn test_fail_closed_surfaces_and_logs() {
        let runner = Arc::new(RecordingRunner::new().with_response(Err(
            BridgeError::ProcessExitedNonZero {
                exit_code: Some(1),
                stderr: "missing data file".to_string(),
            },
        )));
        let plugin = plugin_with(&runner, PluginSettings::default());
        let site = MockSite::new();
        plugin.init(Arc::new(site.clone())).unwrap();
        let mut eval = MockEval::new("1440", 0.0, 0.0, 400_000.0);

        let err = plugin.evaluate(&mut eval).unwrap_err();

        match err {
            PluginError::Bridge(bridge) => assert_eq!(bridge.exit_code(), Some(1)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(eval.density.is_none());
        let alarms = site.messages_with(MessageSeverity::Alarm);
        assert_eq!(alarms.len(), 1);
        assert!(alarms[0].contains("missing data file"));
    }

    #[test]
    fn test_fail_open_returns_fallback_and_logs() {
        let runner = Arc::new(RecordingRunner::new().with_response(Ok(ProcessOutput::default())));
        let plugin = plugin_with(&runner, fail_open(1e-12));
        let site = MockSite::new();
        plugin.init(Arc::new(site.clone())).unwrap();
        let mut eval = MockEval::new("1440", 0.0, 0.0, 400_000.0);

        let density = plugin.evaluate(&mut eval).unwrap();

        assert_eq!(density.kg_per_m3(), 1e-12);
        assert_eq!(eval.density, Some(1e-12));
        let alarms = site.messages_with(MessageSeverity::Alarm);
        assert_eq!(alarms.len(), 1);
        assert!(alarms[0].contains("no output"));
    }

    #[test]
    fn test_scenario_unavailable() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, PluginSettings::default());
        plugin.init(Arc::new(MockSite::new().without_scenario())).unwrap();

        assert!(matches!(
            plugin.evaluate_query(&test_query()),
            Err(PluginError::ScenarioUnavailable)
        ));
        assert_eq!(runner.spawn_count(), 0);
    }

    #[test]
    fn test_scenario_window_reread_per_query() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, PluginSettings::default());
        let site = MockSite::new();
        plugin.init(Arc::new(site.clone())).unwrap();

        plugin.evaluate_query(&test_query()).unwrap();
        site.set_window(Some(ScenarioWindow::new("2025-01-01T00:00:00", "2025-01-02T00:00:00")));
        plugin.evaluate_query(&test_query()).unwrap();

        let invocations = runner.invocations();
        assert_eq!(invocations[0].arguments()[4], "2024-05-10T00:00:00");
        assert_eq!(invocations[1].arguments()[4], "2025-01-01T00:00:00");
    }

    #[test]
    fn test_evaluate_batch() {
        let runner = Arc::new(
            RecordingRunner::new()
                .with_response(Ok(ProcessOutput {
                    stdout: "1.0".to_string(),
                    stderr: String::new(),
                }))
                .with_response(Ok(ProcessOutput {
                    stdout: "abc".to_string(),
                    stderr: String::new(),
                })),
        );
        let plugin = plugin_with(&runner, PluginSettings::default());
        plugin.init(Arc::new(MockSite::new())).unwrap();

        let results = plugin
            .evaluate_batch(&[test_query(), test_query(), test_query()])
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().kg_per_m3(), 1.0);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().kg_per_m3(), 1.225);
    }

    #[test]
    fn test_verify_reports_to_site() {
        let runner = Arc::new(RecordingRunner::new());
        let plugin = plugin_with(&runner, PluginSettings::default());
        let site = MockSite::new();
        plugin.init(Arc::new(site.clone())).unwrap();

        let result = plugin.verify_plugin_config();

        // test_bridge_config points at a script that does not exist.
        assert!(!result.result);
        assert_eq!(site.messages_with(MessageSeverity::Alarm).len(), 1);
    }

    #[test]
    fn test_plugin_config_view() {
        let runner = Arc::new(RecordingRunner::new());
        let view = plugin_with(&runner, fail_open(0.0)).plugin_config();
        assert_eq!(view.script, "/opt/wam/read_density.py");
        assert_eq!(view.failure_mode, "fail_open");
    }
}
