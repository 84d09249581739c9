//! End-to-end engine runs through the public API with an in-process
//! deterministic backend (no network).
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use httpbench::bench::Engine;
use httpbench::client::{Backend, BackendRegistry, ExecutionOutcome, RequestSpec};
use httpbench::config::{BenchmarkConfiguration, SchedulingMode};
use httpbench::error::{AppError, ConfigError};

const EPSILON: f64 = 1e-9;

fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < EPSILON
}

/// Replays scripted outcomes, simulating the scripted latency with real
/// sleeps so both disciplines interleave the way live traffic would.
struct ReplayBackend {
    script: Mutex<Vec<ExecutionOutcome>>,
    executed: AtomicU64,
    simulate_latency: bool,
}

impl ReplayBackend {
    fn new(script: Vec<ExecutionOutcome>, simulate_latency: bool) -> Arc<Self> {
        let mut script = script;
        script.reverse();
        Arc::new(Self {
            script: Mutex::new(script),
            executed: AtomicU64::new(0),
            simulate_latency,
        })
    }

    fn pop(&self) -> ExecutionOutcome {
        self.executed.fetch_add(1, Ordering::Relaxed);
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop())
            .unwrap_or_else(|| ExecutionOutcome::success(200, Duration::from_millis(1)))
    }
}

#[async_trait]
impl Backend for ReplayBackend {
    fn name(&self) -> &str {
        "replay"
    }

    fn supports(&self, _mode: SchedulingMode) -> bool {
        true
    }

    fn execute(&self, _spec: &RequestSpec) -> ExecutionOutcome {
        let outcome = self.pop();
        if self.simulate_latency && outcome.success {
            std::thread::sleep(outcome.elapsed.min(Duration::from_millis(20)));
        }
        outcome
    }

    async fn execute_async(&self, _spec: &RequestSpec) -> ExecutionOutcome {
        let outcome = self.pop();
        if self.simulate_latency && outcome.success {
            tokio::time::sleep(outcome.elapsed.min(Duration::from_millis(20))).await;
        }
        outcome
    }
}

fn engine_with(backend: &Arc<ReplayBackend>) -> Engine {
    let mut registry = BackendRegistry::builtin();
    let shared = Arc::clone(backend);
    registry.register("replay", move |_config| {
        Ok(Arc::clone(&shared) as Arc<dyn Backend>)
    });
    Engine::new(registry)
}

fn replay_config(mode: SchedulingMode, total: u64, concurrency: usize) -> BenchmarkConfiguration {
    BenchmarkConfiguration {
        url: "http://localhost:8080/".to_owned(),
        backend: "replay".to_owned(),
        mode,
        concurrency,
        total_requests: Some(total),
        duration_seconds: 1,
        ..BenchmarkConfiguration::default()
    }
}

fn success(secs: f64) -> ExecutionOutcome {
    ExecutionOutcome::success(200, Duration::from_secs_f64(secs))
}

#[test]
fn scenario_a_five_successes_sequentially() -> Result<(), String> {
    let backend = ReplayBackend::new(
        vec![
            success(0.10),
            success(0.20),
            success(0.15),
            success(0.30),
            success(0.25),
        ],
        false,
    );
    let engine = engine_with(&backend);
    let result = engine
        .run(&replay_config(SchedulingMode::Blocking, 5, 1))
        .map_err(|err| format!("run failed: {}", err))?;
    let stats = &result.statistics;

    assert_eq!(stats.requests_count, 5);
    assert_eq!(stats.error_count, 0);
    assert!(close(stats.min_response_time, 0.10));
    assert!(close(stats.max_response_time, 0.30));
    assert!(close(stats.avg_response_time, 0.20));
    assert!(close(stats.p95_response_time, 0.30));
    assert!(close(stats.error_rate, 0.0));
    Ok(())
}

#[test]
fn scenario_b_mixed_successes_and_failures() -> Result<(), String> {
    let backend = ReplayBackend::new(
        vec![
            success(0.1),
            success(0.2),
            success(0.3),
            ExecutionOutcome::failure("timeout"),
            ExecutionOutcome::failure("connection refused"),
        ],
        false,
    );
    let engine = engine_with(&backend);
    let result = engine
        .run(&replay_config(SchedulingMode::Blocking, 5, 1))
        .map_err(|err| format!("run failed: {}", err))?;
    let stats = &result.statistics;

    assert_eq!(stats.requests_count, 5);
    assert_eq!(stats.error_count, 2);
    assert!(close(stats.error_rate, 40.0));
    assert!(close(stats.min_response_time, 0.1));
    assert!(close(stats.max_response_time, 0.3));
    assert!(close(stats.avg_response_time, 0.2));
    Ok(())
}

#[test]
fn scenario_c_unknown_backend_fails_without_network_activity() {
    let backend = ReplayBackend::new(vec![], false);
    let engine = engine_with(&backend);
    let config = BenchmarkConfiguration {
        backend: "nonexistent".to_owned(),
        ..replay_config(SchedulingMode::Blocking, 5, 1)
    };

    assert!(matches!(
        engine.run(&config),
        Err(AppError::Config(ConfigError::UnknownBackend { .. }))
    ));
    assert_eq!(backend.executed.load(Ordering::Relaxed), 0);
}

#[test]
fn parallel_workers_preserve_aggregate_invariants() -> Result<(), String> {
    // Latency simulation makes workers finish out of submission order.
    let script: Vec<ExecutionOutcome> = (1..=40)
        .map(|i| {
            if i % 10 == 0 {
                ExecutionOutcome::failure("injected failure")
            } else {
                success(f64::from(i % 7 + 1) / 1000.0)
            }
        })
        .collect();
    let backend = ReplayBackend::new(script, true);
    let engine = engine_with(&backend);
    let result = engine
        .run(&replay_config(SchedulingMode::Blocking, 40, 8))
        .map_err(|err| format!("run failed: {}", err))?;
    let stats = &result.statistics;

    assert_eq!(stats.requests_count, 40);
    assert_eq!(stats.error_count, 4);
    assert!(stats.error_rate >= 0.0);
    assert!(stats.error_rate <= 100.0);
    assert!(stats.min_response_time <= stats.avg_response_time);
    assert!(stats.avg_response_time <= stats.max_response_time);
    assert!(stats.p95_response_time <= stats.p99_response_time);
    Ok(())
}

#[test]
fn cooperative_tasks_preserve_aggregate_invariants() -> Result<(), String> {
    let script: Vec<ExecutionOutcome> = (1..=30)
        .map(|i| success(f64::from(i % 5 + 1) / 1000.0))
        .collect();
    let backend = ReplayBackend::new(script, true);
    let engine = engine_with(&backend);
    let result = engine
        .run(&replay_config(SchedulingMode::NonBlocking, 30, 10))
        .map_err(|err| format!("run failed: {}", err))?;
    let stats = &result.statistics;

    assert_eq!(stats.requests_count, 30);
    assert_eq!(stats.error_count, 0);
    assert_eq!(backend.executed.load(Ordering::Relaxed), 30);
    assert!(stats.p99_response_time <= stats.max_response_time);
    Ok(())
}

#[test]
fn result_resource_fields_are_well_formed() -> Result<(), String> {
    let backend = ReplayBackend::new(vec![], false);
    let engine = engine_with(&backend);
    let result = engine
        .run(&replay_config(SchedulingMode::Blocking, 10, 2))
        .map_err(|err| format!("run failed: {}", err))?;

    assert!(result.cpu_usage_avg >= 0.0);
    assert!(result.memory_usage_avg >= 0.0);
    // u64 deltas are clamped at the sampler; spot-check serialization too.
    let json = serde_json::to_value(&result).map_err(|err| format!("serialize failed: {}", err))?;
    assert!(json.get("network_io").is_some());
    assert!(json.get("statistics").is_some());
    assert_eq!(
        json.pointer("/statistics/requests_count")
            .and_then(serde_json::Value::as_u64),
        Some(10)
    );
    Ok(())
}
