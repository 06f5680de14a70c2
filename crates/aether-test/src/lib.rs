//! Aether Test - Shared test utilities for the Aether workspace.
//!
//! Mock host collaborators, a recording model runner and stub model
//! scripts, used across crates as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! aether-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use aether_test::{MockSite, RecordingRunner, test_query, test_window};
//!
//! #[tokio::test]
//! async fn test_compute() {
//!     let runner = Arc::new(RecordingRunner::new().with_stdout("1.225"));
//!     let bridge = DensityBridge::with_runner(test_bridge_config(), runner.clone());
//!     bridge.compute(&test_query(), &test_window()).await.unwrap();
//!     assert_eq!(runner.spawn_count(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
