//! Aether Telemetry - Logging and tracing for the Aether density bridge.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats and targets
//! - A per-evaluation context for correlating one density query across
//!   the adapter, the bridge and the model process
//!
//! # Example
//!
//! ```rust,no_run
//! use aether_telemetry::{EvaluationContext, LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), aether_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("aether_bridge=trace");
//!
//! setup_logging(&config)?;
//!
//! let ctx = EvaluationContext::new("density_plugin").with_epoch("12.5");
//! let span = ctx.span();
//! let _guard = span.enter();
//! tracing::info!("Evaluating density");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::EvaluationContext;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
