//! The benchmark engine: drives N concurrent request executions under one
//! of two scheduling disciplines and reduces the outcomes into a result.
mod blocking;
mod nonblocking;
mod result;


use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::client::{BackendRegistry, RequestSpec};
use crate::config::{BenchmarkConfiguration, SchedulingMode};
use crate::error::{AppError, AppResult, BackendError};
use crate::metrics;
use crate::system::ResourceSampler;

pub use result::BenchmarkResult;

/// Runs benchmarks against the backends held by its registry.
pub struct Engine {
    registry: BackendRegistry,
}

impl Engine {
    #[must_use]
    pub const fn new(registry: BackendRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Executes one benchmark run and assembles its immutable result.
    ///
    /// A single request's failure never aborts the run; it is counted and
    /// the run continues. Only configuration-time errors (invalid bounds,
    /// unknown backend, unsupported mode) and backend construction
    /// failures are surfaced here.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid configurations or unknown backend
    /// identifiers and `BackendError` when the backend rejects the
    /// scheduling mode or cannot build its client.
    pub fn run(&self, config: &BenchmarkConfiguration) -> AppResult<BenchmarkResult> {
        config.validate().map_err(AppError::config)?;

        let backend = self.registry.resolve(config)?;
        if !backend.supports(config.mode) {
            return Err(AppError::backend(BackendError::UnsupportedMode {
                backend: backend.name().to_owned(),
                mode: config.mode,
            }));
        }

        let spec = Arc::new(RequestSpec::from_configuration(config).map_err(AppError::config)?);
        let total_requests = config.resolved_total_requests();

        info!(
            name = %config.name,
            backend = %backend.name(),
            mode = %config.mode,
            url = %config.url,
            concurrency = config.concurrency,
            total_requests,
            "Starting benchmark"
        );

        let start_time = Utc::now();
        let mut sampler = ResourceSampler::new();
        sampler.start_sampling();
        let snapshot_before = sampler.snapshot();

        let outcomes = match config.mode {
            SchedulingMode::Blocking => {
                blocking::run(backend.as_ref(), &spec, total_requests, config.concurrency)
            }
            SchedulingMode::NonBlocking => {
                nonblocking::run(Arc::clone(&backend), Arc::clone(&spec), total_requests)?
            }
        };
        debug!(collected = outcomes.len(), "Execution phase finished");

        let snapshot_after = sampler.snapshot();
        let network_delta = sampler.network_delta();
        let resources = sampler.stop_sampling();
        backend.shutdown();
        let end_time = Utc::now();

        let statistics = metrics::reduce(&outcomes, config.duration_seconds);
        let run_result = result::assemble(
            config,
            statistics,
            start_time,
            end_time,
            &snapshot_before,
            &snapshot_after,
            network_delta,
            resources,
        );

        info!(
            requests = run_result.statistics.requests_count,
            errors = run_result.statistics.error_count,
            rps = run_result.statistics.requests_per_second,
            "Benchmark completed"
        );
        Ok(run_result)
    }
}
