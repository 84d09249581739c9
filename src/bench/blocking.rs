use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;

use tracing::debug;

use crate::client::{Backend, ExecutionOutcome, RequestSpec};

/// Blocking discipline: a bounded pool of OS worker threads, one request
/// per task, drained as each completes.
///
/// Workers pull the next request index from a shared counter, so the full
/// batch is committed up front while no worker ever holds more than one
/// in-flight request. Completion order is whatever the scheduler gives us;
/// the collector is order-agnostic.
pub(super) fn run(
    backend: &dyn Backend,
    spec: &RequestSpec,
    total_requests: u64,
    concurrency: usize,
) -> Vec<ExecutionOutcome> {
    let worker_count = usize::try_from(total_requests)
        .unwrap_or(usize::MAX)
        .min(concurrency)
        .max(1);
    debug!(worker_count, total_requests, "Running blocking discipline");

    let next_request = AtomicU64::new(0);
    let (outcome_tx, outcome_rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let outcome_tx = outcome_tx.clone();
            let next_request = &next_request;
            scope.spawn(move || {
                while next_request.fetch_add(1, Ordering::Relaxed) < total_requests {
                    if outcome_tx.send(backend.execute(spec)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(outcome_tx);

        // Receives until every worker has dropped its sender.
        outcome_rx.iter().collect()
    })
}
