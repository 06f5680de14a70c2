//! Evaluation context for correlating one density query across components.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one density evaluation in logs.
///
/// The adapter creates one per host call; the bridge records spawn and
/// parse events inside its span, so a single id ties the host request to
/// the model process that served it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Unique evaluation identifier.
    pub evaluation_id: Uuid,
    /// When the evaluation started.
    pub started_at: DateTime<Utc>,
    /// Component that created this context.
    pub source: String,
    /// Query epoch, if known.
    pub epoch: Option<String>,
}

impl EvaluationContext {
    /// Create a new evaluation context.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            evaluation_id: Uuid::new_v4(),
            started_at: Utc::now(),
            source: source.into(),
            epoch: None,
        }
    }

    /// Attach the query epoch.
    #[must_use]
    pub fn with_epoch(mut self, epoch: impl Into<String>) -> Self {
        self.epoch = Some(epoch.into());
        self
    }

    /// Milliseconds since the evaluation started.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        // started_at is set at construction, so the subtraction cannot underflow.
        #[allow(clippy::arithmetic_side_effects)]
        let elapsed = Utc::now() - self.started_at;
        elapsed.num_milliseconds()
    }

    /// Create a tracing span carrying this context.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "density_evaluation",
            evaluation_id = %self.evaluation_id,
            source = %self.source,
            epoch = self.epoch.as_deref(),
        )
    }

    /// First eight characters of the evaluation id.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.evaluation_id.simple().to_string().chars().take(8).collect()
    }
}
