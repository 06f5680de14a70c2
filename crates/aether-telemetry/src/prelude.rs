//! Prelude module - commonly used types for convenient import.
//!
//! Use `use aether_telemetry::prelude::*;` to import all essential types.

// Errors
pub use crate::{TelemetryError, TelemetryResult};

// Logging configuration
pub use crate::{LogConfig, LogFormat, LogTarget};

// Setup functions
pub use crate::{setup_default_logging, setup_logging};

// Evaluation context
pub use crate::EvaluationContext;
