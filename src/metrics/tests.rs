use std::time::Duration;

use super::*;
use crate::client::ExecutionOutcome;

const EPSILON: f64 = 1e-9;

fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < EPSILON
}

fn success(secs: f64) -> ExecutionOutcome {
    ExecutionOutcome::success(200, Duration::from_secs_f64(secs))
}

fn failure() -> ExecutionOutcome {
    ExecutionOutcome::failure("connection reset")
}

#[test]
fn five_successes_match_the_reference_numbers() {
    // Scenario: elapsed [0.10, 0.20, 0.15, 0.30, 0.25] over a 1s bound.
    let outcomes = vec![
        success(0.10),
        success(0.20),
        success(0.15),
        success(0.30),
        success(0.25),
    ];
    let stats = reduce(&outcomes, 1);

    assert_eq!(stats.requests_count, 5);
    assert_eq!(stats.error_count, 0);
    assert!(close(stats.error_rate, 0.0));
    assert!(close(stats.requests_per_second, 5.0));
    assert!(close(stats.min_response_time, 0.10));
    assert!(close(stats.max_response_time, 0.30));
    assert!(close(stats.avg_response_time, 0.20));
    // floor(0.95 * 5) = 4 -> 5th element of the sorted sequence.
    assert!(close(stats.p95_response_time, 0.30));
    assert!(close(stats.p99_response_time, 0.30));
}

#[test]
fn failures_count_toward_errors_but_not_latency() {
    let outcomes = vec![
        success(0.1),
        success(0.2),
        success(0.3),
        failure(),
        failure(),
    ];
    let stats = reduce(&outcomes, 1);

    assert_eq!(stats.requests_count, 5);
    assert_eq!(stats.error_count, 2);
    assert!(close(stats.error_rate, 40.0));
    assert!(close(stats.min_response_time, 0.1));
    assert!(close(stats.max_response_time, 0.3));
    assert!(close(stats.avg_response_time, 0.2));
}

#[test]
fn zero_successes_zero_all_timing_fields() {
    let outcomes = vec![failure(), failure(), failure()];
    let stats = reduce(&outcomes, 10);

    assert_eq!(stats.requests_count, 3);
    assert_eq!(stats.error_count, 3);
    assert!(close(stats.error_rate, 100.0));
    assert!(close(stats.avg_response_time, 0.0));
    assert!(close(stats.min_response_time, 0.0));
    assert!(close(stats.max_response_time, 0.0));
    assert!(close(stats.p95_response_time, 0.0));
    assert!(close(stats.p99_response_time, 0.0));
}

#[test]
fn empty_outcome_set_is_all_zeros() {
    let stats = reduce(&[], 30);
    assert_eq!(stats.requests_count, 0);
    assert!(close(stats.error_rate, 0.0));
    assert!(close(stats.requests_per_second, 0.0));
}

#[test]
fn reduction_is_independent_of_completion_order() {
    let forward = vec![success(0.05), success(0.10), success(0.15), failure()];
    let mut reversed = forward.clone();
    reversed.reverse();

    assert_eq!(reduce(&forward, 2), reduce(&reversed, 2));
}

#[test]
fn percentiles_are_monotonic() {
    let outcomes: Vec<ExecutionOutcome> = (1..=100).map(|i| success(f64::from(i) / 100.0)).collect();
    let stats = reduce(&outcomes, 10);

    assert!(stats.min_response_time <= stats.avg_response_time);
    assert!(stats.avg_response_time <= stats.max_response_time);
    assert!(stats.p95_response_time <= stats.p99_response_time);
    assert!(stats.p99_response_time <= stats.max_response_time);
}

#[test]
fn percentile_index_is_floor_clamped() {
    let sorted = [0.1, 0.2, 0.3];
    // floor(0.95 * 3) = 2, floor(0.99 * 3) = 2.
    assert!(close(percentile(&sorted, 0.95), 0.3));
    assert!(close(percentile(&sorted, 0.99), 0.3));

    let single = [0.5];
    assert!(close(percentile(&single, 0.95), 0.5));
    assert!(close(percentile(&[], 0.95), 0.0));
}

#[test]
fn percentile_computation_is_idempotent() {
    let sorted = [0.01, 0.02, 0.03, 0.04, 0.05, 0.06];
    let first = percentile(&sorted, 0.95);
    let second = percentile(&sorted, 0.95);
    assert!(first.to_bits() == second.to_bits());
}

#[test]
fn throughput_uses_the_configured_duration() {
    let outcomes = vec![success(0.1); 30];
    let stats = reduce(&outcomes, 10);
    assert!(close(stats.requests_per_second, 3.0));
}
