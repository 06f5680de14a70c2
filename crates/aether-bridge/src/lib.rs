//! Aether Bridge - Runs an external density model as a subprocess.
//!
//! One density query maps to exactly one process lifecycle:
//!
//! 1. Convert the query to model units (degrees, `[0, 360)` longitude, km)
//! 2. Build the positional invocation
//!    `<interpreter> <script> <epoch> <alt_km> <lat_deg> <lon_deg> <start> <stop>`
//! 3. Spawn the process under a timeout and a concurrency limit
//! 4. Parse one density value from its stdout
//!
//! # Example
//!
//! ```rust,ignore
//! use aether_bridge::{BridgeConfig, DensityBridge};
//! use aether_core::{DensityQuery, ScenarioWindow};
//!
//! let bridge = DensityBridge::new(BridgeConfig::new("python3", "/opt/wam/read_density.py"));
//! let density = bridge
//!     .compute(
//!         &DensityQuery::new("1440", 0.2, -1.1, 400_000.0),
//!         &ScenarioWindow::new("2024-05-10T00:00:00", "2024-05-12T00:00:00"),
//!     )
//!     .await?;
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod bridge;
pub mod config;
pub mod conversion;
pub mod error;
pub mod invocation;
pub mod output;
pub mod runner;

pub use bridge::DensityBridge;
pub use config::BridgeConfig;
pub use conversion::ModelCoordinates;
pub use error::{BridgeError, BridgeResult};
pub use invocation::ModelInvocation;
pub use output::parse_density_output;
pub use runner::{DEFAULT_TIMEOUT, ModelRunner, ProcessOutput, SubprocessRunner, resolve_executable};
