//! Prelude module - commonly used types for convenient import.
//!
//! Use `use aether_bridge::prelude::*;` to import all essential types.

pub use crate::{BridgeConfig, DensityBridge};

pub use crate::{BridgeError, BridgeResult};

pub use crate::{ModelInvocation, ModelRunner, ProcessOutput, SubprocessRunner};
