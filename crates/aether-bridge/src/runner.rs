//! Model process runner.
//!
//! # Isolation
//!
//! Each invocation spawns exactly one process:
//! - arguments are passed as separate argv elements, never through a shell
//! - stdin is closed; stdout and stderr are captured
//! - no console window is created on Windows
//! - the child is killed when the run is dropped or times out
//!
//! With sandboxing enabled the environment is cleared, then refilled from an
//! allowlist and a restricted `PATH`.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{BridgeError, BridgeResult};
use crate::invocation::ModelInvocation;

/// Default time a single model run may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variables inherited from the parent when sandboxed.
const ALLOWED_ENV_VARS: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "LANG",
    "LC_ALL",
    "LC_CTYPE",
    "TMPDIR",
    "TMP",
    "TEMP",
    "SYSTEMROOT",
];

#[cfg(unix)]
const SAFE_PATH_DIRS: &[&str] = &["/usr/bin", "/bin", "/usr/local/bin"];

#[cfg(windows)]
const SAFE_PATH_DIRS: &[&str] = &[r"C:\Windows\System32", r"C:\Windows"];

/// `CREATE_NO_WINDOW` process creation flag.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Captured output of a successful model run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

/// Executes model invocations.
///
/// Implementations must start one process per call and must not reuse
/// processes across calls.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    /// Run `invocation` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started, exits
    /// unsuccessfully, or exceeds its time limit.
    async fn run(&self, invocation: &ModelInvocation) -> BridgeResult<ProcessOutput>;
}

/// Runs invocations as real OS processes.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    timeout: Duration,
    working_dir: Option<PathBuf>,
    env: HashMap<String, String>,
    sandboxed: bool,
}

impl Default for SubprocessRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            working_dir: None,
            env: HashMap::new(),
            sandboxed: false,
        }
    }
}

impl SubprocessRunner {
    /// Create a runner with the default timeout and no sandboxing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-run timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the model from `dir`.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Add environment variables for the model process.
    #[must_use]
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    /// Enable or disable environment sandboxing.
    #[must_use]
    pub fn with_sandbox(mut self, sandboxed: bool) -> Self {
        self.sandboxed = sandboxed;
        self
    }

    /// The configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn safe_path() -> String {
        SAFE_PATH_DIRS.join(if cfg!(windows) { ";" } else { ":" })
    }

    fn command(&self, executable: &Path, invocation: &ModelInvocation) -> Command {
        let mut cmd = Command::new(executable);
        cmd.args(invocation.argv());
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        if self.sandboxed {
            cmd.env_clear();
            for var in ALLOWED_ENV_VARS {
                if *var == "PATH" {
                    cmd.env("PATH", Self::safe_path());
                } else if let Ok(value) = std::env::var(var) {
                    cmd.env(var, value);
                }
            }
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd
    }
}

#[async_trait]
impl ModelRunner for SubprocessRunner {
    async fn run(&self, invocation: &ModelInvocation) -> BridgeResult<ProcessOutput> {
        let executable = resolve_executable(invocation.executable())?;

        debug!(
            executable = %executable.display(),
            command_line = %invocation.command_line(),
            sandboxed = self.sandboxed,
            "spawning density model"
        );

        let mut cmd = self.command(&executable, invocation);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BridgeError::ExecutableNotFound {
                    path: executable.clone(),
                }
            } else {
                BridgeError::ProcessLaunchFailed {
                    executable: executable.clone(),
                    source: e,
                }
            }
        })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    executable = %executable.display(),
                    timeout_secs = self.timeout.as_secs_f64(),
                    "density model timed out"
                );
                return Err(BridgeError::ProcessTimedOut {
                    timeout: self.timeout,
                });
            },
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let exit_code = output.status.code();
            warn!(
                executable = %executable.display(),
                exit_code = ?exit_code,
                stderr = %stderr.trim(),
                "density model failed"
            );
            return Err(BridgeError::ProcessExitedNonZero { exit_code, stderr });
        }

        Ok(ProcessOutput { stdout, stderr })
    }
}

/// Resolve the interpreter to an existing file.
///
/// A path with directory components must exist as given. A bare name is
/// looked up on `PATH`.
///
/// # Errors
///
/// Returns [`BridgeError::ExecutableNotFound`] if neither succeeds.
pub fn resolve_executable(path: &Path) -> BridgeResult<PathBuf> {
    let not_found = || BridgeError::ExecutableNotFound {
        path: path.to_path_buf(),
    };

    if path.as_os_str().is_empty() {
        return Err(not_found());
    }

    if path.components().count() > 1 || path.is_absolute() {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(not_found())
        };
    }

    which::which(path).map_err(|_| not_found())
}
