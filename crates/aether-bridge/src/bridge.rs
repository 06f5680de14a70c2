//! The density bridge: one query in, one model process, one density out.

use std::sync::Arc;

use aether_core::{Density, DensityQuery, ScenarioWindow};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::invocation::ModelInvocation;
use crate::output::parse_density_output;
use crate::runner::ModelRunner;

/// Delegates density computation to an external model process.
///
/// Nothing is cached: every call to [`compute`](Self::compute) spawns a
/// fresh process. A semaphore bounds how many processes run at once.
#[derive(Clone)]
pub struct DensityBridge {
    config: BridgeConfig,
    runner: Arc<dyn ModelRunner>,
    permits: Arc<Semaphore>,
}

impl std::fmt::Debug for DensityBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DensityBridge")
            .field("config", &self.config)
            .field("available_permits", &self.permits.available_permits())
            .finish_non_exhaustive()
    }
}

impl DensityBridge {
    /// Create a bridge that runs real subprocesses.
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        let runner = Arc::new(config.runner());
        Self::with_runner(config, runner)
    }

    /// Create a bridge with a custom runner.
    #[must_use]
    pub fn with_runner(config: BridgeConfig, runner: Arc<dyn ModelRunner>) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_processes.max(1)));
        Self {
            config,
            runner,
            permits,
        }
    }

    /// The bridge configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Build the invocation for one query.
    #[must_use]
    pub fn invocation(&self, query: &DensityQuery, window: &ScenarioWindow) -> ModelInvocation {
        ModelInvocation::build(
            &self.config.interpreter,
            &self.config.script,
            query,
            window,
        )
    }

    /// Compute the density for one query.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] if the model cannot be run or its output
    /// is not a density value.
    pub async fn compute(
        &self,
        query: &DensityQuery,
        window: &ScenarioWindow,
    ) -> BridgeResult<Density> {
        let invocation = self.invocation(query, window);

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| BridgeError::LimiterClosed)?;

        let output = self.runner.run(&invocation).await?;

        if !output.stderr.trim().is_empty() {
            debug!(stderr = %output.stderr.trim(), "density model wrote to stderr");
        }

        match parse_density_output(&output.stdout) {
            Ok(value) => {
                debug!(epoch = %query.epoch, density = value, "density model returned");
                Ok(Density::from_kg_per_m3(value))
            },
            Err(e) => {
                warn!(
                    command_line = %invocation.command_line(),
                    error = %e,
                    "density model output rejected"
                );
                Err(e)
            },
        }
    }

    /// Compute densities for many queries, bounded by the process limit.
    ///
    /// Results are returned in input order.
    pub async fn compute_batch(
        &self,
        queries: &[DensityQuery],
        window: &ScenarioWindow,
    ) -> Vec<BridgeResult<Density>> {
        join_all(queries.iter().map(|query| self.compute(query, window))).await
    }
}
