//! Bridge error types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from one external model invocation.
///
/// Every variant is recoverable at the caller; none are retried.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The interpreter could not be found on disk or on `PATH`.
    #[error("model executable not found: {}", .path.display())]
    ExecutableNotFound {
        /// The configured executable.
        path: PathBuf,
    },

    /// The process could not be started.
    #[error("failed to launch {}: {source}", .executable.display())]
    ProcessLaunchFailed {
        /// The executable that failed to start.
        executable: PathBuf,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The model exited unsuccessfully.
    #[error(
        "model exited with code {}: {}",
        exit_code_label(.exit_code.to_owned()),
        .stderr.trim()
    )]
    ProcessExitedNonZero {
        /// Exit code, or `None` when terminated by a signal.
        exit_code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// The model did not finish within the configured timeout.
    #[error("model timed out after {timeout:?}")]
    ProcessTimedOut {
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The model exited successfully but wrote nothing to stdout.
    #[error("model produced no output")]
    EmptyOutput,

    /// The model output is not a single density value.
    #[error("model output is not a density value: {output:?}")]
    MalformedNumericOutput {
        /// The offending output, truncated.
        output: String,
    },

    /// The process limiter was closed.
    #[error("process limiter closed")]
    LimiterClosed,

    /// I/O error while talking to the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_label(code: Option<i32>) -> String {
    code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
}

impl BridgeError {
    /// Exit code carried by [`BridgeError::ProcessExitedNonZero`].
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ProcessExitedNonZero { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
