//! Reduction of per-request outcomes into run-level aggregate statistics.
#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::client::ExecutionOutcome;

/// Run-level summary of all outcomes. Derived once, never mutated.
///
/// Timing fields are seconds. When zero successful outcomes exist every
/// timing field is exactly 0 so downstream consumers never divide by zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStatistics {
    pub requests_count: u64,
    pub requests_per_second: f64,
    pub avg_response_time: f64,
    pub min_response_time: f64,
    pub max_response_time: f64,
    pub p95_response_time: f64,
    pub p99_response_time: f64,
    pub error_count: u64,
    pub error_rate: f64,
}

/// Reduces a completed outcome set into aggregate statistics.
///
/// Tolerant of arbitrary completion order: only the multiset of elapsed
/// times matters. Failures contribute to the error counters but never to
/// the latency distribution. Throughput divides the completed-request
/// count by the configured duration bound, not measured wall-clock time;
/// that definition is kept for comparability across runs.
#[must_use]
pub fn reduce(outcomes: &[ExecutionOutcome], duration_seconds: u64) -> AggregateStatistics {
    let mut response_times: Vec<f64> = outcomes
        .iter()
        .filter(|outcome| outcome.success)
        .map(|outcome| outcome.elapsed.as_secs_f64())
        .collect();
    response_times.sort_by(f64::total_cmp);

    let error_count = (outcomes.len() - response_times.len()) as u64;
    let requests_count = outcomes.len() as u64;

    let (avg, min, max) = if response_times.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = response_times.iter().sum();
        let count = response_times.len() as f64;
        (
            sum / count,
            response_times.first().copied().unwrap_or(0.0),
            response_times.last().copied().unwrap_or(0.0),
        )
    };

    let requests_per_second = if duration_seconds > 0 {
        requests_count as f64 / duration_seconds as f64
    } else {
        0.0
    };
    let error_rate = if requests_count > 0 {
        error_count as f64 / requests_count as f64 * 100.0
    } else {
        0.0
    };

    AggregateStatistics {
        requests_count,
        requests_per_second,
        avg_response_time: avg,
        min_response_time: min,
        max_response_time: max,
        p95_response_time: percentile(&response_times, 0.95),
        p99_response_time: percentile(&response_times, 0.99),
        error_count,
        error_rate,
    }
}

/// Order-statistic percentile: index `floor(p * count)` clamped to
/// `count - 1`, no interpolation. Empty input yields 0.
#[must_use]
pub fn percentile(sorted_times: &[f64], p: f64) -> f64 {
    if sorted_times.is_empty() {
        return 0.0;
    }
    let index = ((p * sorted_times.len() as f64).floor() as usize).min(sorted_times.len() - 1);
    sorted_times.get(index).copied().unwrap_or(0.0)
}
