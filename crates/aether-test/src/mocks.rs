//! Mock implementations for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use aether_bridge::{BridgeResult, ModelInvocation, ModelRunner, ProcessOutput};
use aether_core::{DensityEval, MessageSeverity, PluginSite, RegisterResult, ScenarioWindow};

use crate::fixtures::test_window;

/// A captured host message.
pub type CapturedMessage = (MessageSeverity, String);

/// Mock implementation of the host's plugin site.
///
/// Cloning shares the captured state, so a test can keep a handle after
/// passing the site to a plugin.
#[derive(Debug, Clone)]
pub struct MockSite {
    messages: Arc<Mutex<Vec<CapturedMessage>>>,
    unit_preferences: Arc<Mutex<Vec<(String, String)>>>,
    window: Arc<Mutex<Option<ScenarioWindow>>>,
    reject_unit_preferences: bool,
}

impl Default for MockSite {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSite {
    /// Create a site with the default test scenario loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            unit_preferences: Arc::new(Mutex::new(Vec::new())),
            window: Arc::new(Mutex::new(Some(test_window()))),
            reject_unit_preferences: false,
        }
    }

    /// Use `window` as the scenario bounds.
    #[must_use]
    pub fn with_window(self, window: ScenarioWindow) -> Self {
        self.set_window(Some(window));
        self
    }

    /// Report that no scenario is loaded.
    #[must_use]
    pub fn without_scenario(self) -> Self {
        self.set_window(None);
        self
    }

    /// Reject every unit preference change.
    #[must_use]
    pub fn rejecting_unit_preferences(mut self) -> Self {
        self.reject_unit_preferences = true;
        self
    }

    /// Replace the scenario bounds while the site is in use.
    pub fn set_window(&self, window: Option<ScenarioWindow>) {
        if let Ok(mut guard) = self.window.lock() {
            *guard = window;
        }
    }

    /// All captured messages.
    #[must_use]
    pub fn messages(&self) -> Vec<CapturedMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Captured message texts at `severity`.
    #[must_use]
    pub fn messages_with(&self, severity: MessageSeverity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    /// Captured `(dimension, unit)` preference changes.
    #[must_use]
    pub fn unit_preferences(&self) -> Vec<(String, String)> {
        self.unit_preferences
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

impl PluginSite for MockSite {
    fn message(&self, severity: MessageSeverity, message: &str) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push((severity, message.to_string()));
        }
    }

    fn scenario_window(&self) -> Option<ScenarioWindow> {
        self.window.lock().ok().and_then(|w| w.clone())
    }

    fn set_unit_preference(&self, dimension: &str, unit: &str) -> Result<(), String> {
        if self.reject_unit_preferences {
            return Err(format!("unit '{unit}' not available for {dimension}"));
        }
        if let Ok(mut guard) = self.unit_preferences.lock() {
            guard.push((dimension.to_string(), unit.to_string()));
        }
        Ok(())
    }
}

/// Mock registration handle.
#[derive(Debug, Clone, Default)]
pub struct MockRegister {
    messages: Arc<Mutex<Vec<CapturedMessage>>>,
}

impl MockRegister {
    /// Create a new registration handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured messages.
    #[must_use]
    pub fn messages(&self) -> Vec<CapturedMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl RegisterResult for MockRegister {
    fn message(&self, severity: MessageSeverity, message: &str) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push((severity, message.to_string()));
        }
    }
}

/// Mock host evaluation object.
#[derive(Debug, Clone)]
pub struct MockEval {
    epoch: String,
    lat_lon_alt: (f64, f64, f64),
    requested_fields: Arc<Mutex<Vec<String>>>,
    /// Density written by the plugin, if any.
    pub density: Option<f64>,
}

impl MockEval {
    /// Create an eval object reporting the given epoch and position.
    #[must_use]
    pub fn new(
        epoch: impl Into<String>,
        latitude_rad: f64,
        longitude_rad: f64,
        altitude_m: f64,
    ) -> Self {
        Self {
            epoch: epoch.into(),
            lat_lon_alt: (latitude_rad, longitude_rad, altitude_m),
            requested_fields: Arc::new(Mutex::new(Vec::new())),
            density: None,
        }
    }

    /// Date fields the plugin asked for.
    #[must_use]
    pub fn requested_fields(&self) -> Vec<String> {
        self.requested_fields
            .lock()
            .map(|f| f.clone())
            .unwrap_or_default()
    }
}

impl DensityEval for MockEval {
    fn date_string(&self, field: &str) -> String {
        if let Ok(mut guard) = self.requested_fields.lock() {
            guard.push(field.to_string());
        }
        self.epoch.clone()
    }

    fn lat_lon_alt(&self) -> (f64, f64, f64) {
        self.lat_lon_alt
    }

    fn set_density(&mut self, density: f64) {
        self.density = Some(density);
    }
}

/// A model runner that records invocations instead of spawning processes.
///
/// Replies with queued results first, then with the default stdout.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    invocations: Arc<Mutex<Vec<ModelInvocation>>>,
    responses: Arc<Mutex<VecDeque<BridgeResult<ProcessOutput>>>>,
    default_stdout: String,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRunner {
    /// Create a runner that answers `1.225`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default_stdout: "1.225\n".to_string(),
        }
    }

    /// Answer every unqueued run with `stdout`.
    #[must_use]
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.default_stdout = stdout.into();
        self
    }

    /// Queue a result for the next run.
    #[must_use]
    pub fn with_response(self, response: BridgeResult<ProcessOutput>) -> Self {
        if let Ok(mut guard) = self.responses.lock() {
            guard.push_back(response);
        }
        self
    }

    /// Number of runs so far (each stands for one spawned process).
    #[must_use]
    pub fn spawn_count(&self) -> usize {
        self.invocations.lock().map(|i| i.len()).unwrap_or_default()
    }

    /// All recorded invocations.
    #[must_use]
    pub fn invocations(&self) -> Vec<ModelInvocation> {
        self.invocations
            .lock()
            .map(|i| i.clone())
            .unwrap_or_default()
    }

    /// Arguments of the most recent invocation.
    #[must_use]
    pub fn last_arguments(&self) -> Option<Vec<String>> {
        self.invocations().last().map(|i| i.arguments().to_vec())
    }
}

#[async_trait]
impl ModelRunner for RecordingRunner {
    async fn run(&self, invocation: &ModelInvocation) -> BridgeResult<ProcessOutput> {
        if let Ok(mut guard) = self.invocations.lock() {
            guard.push(invocation.clone());
        }

        let queued = self
            .responses
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front());

        queued.unwrap_or_else(|| {
            Ok(ProcessOutput {
                stdout: self.default_stdout.clone(),
                stderr: String::new(),
            })
        })
    }
}
