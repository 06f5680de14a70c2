//! Prelude module - commonly used test helpers.

pub use crate::{MockEval, MockRegister, MockSite, RecordingRunner};

pub use crate::{stub_model, test_bridge_config, test_query, test_window};

pub use crate::init_test_tracing;
