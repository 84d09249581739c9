use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::BenchmarkConfiguration;
use crate::metrics::AggregateStatistics;
use crate::system::{NetworkDelta, ResourceReport, ResourceSnapshot};

/// Immutable record of one completed run.
///
/// Created exactly once, after every launched execution has finished;
/// external consumers read it as an opaque, fully populated value.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub backend: String,
    pub method: String,
    pub url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub concurrency: usize,
    pub statistics: AggregateStatistics,
    pub cpu_usage_avg: f64,
    pub memory_usage_avg: f64,
    pub network_io: NetworkDelta,
    pub resources: ResourceReport,
    pub config_snapshot: serde_json::Value,
}

/// Pure assembly of engine output, timing, and resource data.
///
/// CPU/memory averages are the mean of exactly the two snapshots bounding
/// the execution phase, not a time-integrated average.
#[must_use]
pub(super) fn assemble(
    config: &BenchmarkConfiguration,
    statistics: AggregateStatistics,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    before: &ResourceSnapshot,
    after: &ResourceSnapshot,
    network_io: NetworkDelta,
    resources: ResourceReport,
) -> BenchmarkResult {
    let duration_seconds = (end_time - start_time)
        .to_std()
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0);

    BenchmarkResult {
        name: config.name.clone(),
        backend: config.backend.clone(),
        method: config.method.as_str().to_owned(),
        url: config.url.clone(),
        start_time,
        end_time,
        duration_seconds,
        concurrency: config.concurrency,
        statistics,
        cpu_usage_avg: (before.cpu_percent + after.cpu_percent) / 2.0,
        memory_usage_avg: (before.memory_percent + after.memory_percent) / 2.0,
        network_io,
        resources,
        config_snapshot: serde_json::to_value(config).unwrap_or(serde_json::Value::Null),
    }
}
