//! Bridge configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::runner::{DEFAULT_TIMEOUT, SubprocessRunner};

/// Settings for [`DensityBridge`](crate::DensityBridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Interpreter executable (absolute path or a name on `PATH`).
    pub interpreter: PathBuf,
    /// Model script passed to the interpreter.
    pub script: PathBuf,
    /// Per-run timeout.
    pub timeout: Duration,
    /// Maximum number of model processes alive at once.
    pub max_concurrent_processes: usize,
    /// Working directory for the model process.
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables for the model process.
    pub env: HashMap<String, String>,
    /// Clear the inherited environment down to an allowlist.
    pub sandboxed: bool,
}

impl BridgeConfig {
    /// Create a config for `interpreter script` with default limits.
    #[must_use]
    pub fn new(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            timeout: DEFAULT_TIMEOUT,
            max_concurrent_processes: 1,
            working_dir: None,
            env: HashMap::new(),
            sandboxed: false,
        }
    }

    /// Set the per-run timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the process concurrency limit. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_processes(mut self, n: usize) -> Self {
        self.max_concurrent_processes = n.max(1);
        self
    }

    /// The subprocess runner described by this config.
    #[must_use]
    pub fn runner(&self) -> SubprocessRunner {
        let mut runner = SubprocessRunner::new()
            .with_timeout(self.timeout)
            .with_env(self.env.clone())
            .with_sandbox(self.sandboxed);
        if let Some(dir) = &self.working_dir {
            runner = runner.with_working_dir(dir);
        }
        runner
    }
}
