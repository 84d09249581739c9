use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::client::{Backend, ExecutionOutcome, RequestSpec};
use crate::error::AppResult;

/// Non-blocking discipline: N cooperative tasks on a single-threaded
/// runtime, drained as each completes.
///
/// Mirrors an unordered future-set drain: tasks are all spawned eagerly,
/// suspension happens only at I/O waits, and completion order is
/// non-deterministic.
///
/// # Errors
///
/// Returns an error only when the runtime itself cannot be built; request
/// failures are absorbed into outcomes.
pub(super) fn run(
    backend: Arc<dyn Backend>,
    spec: Arc<RequestSpec>,
    total_requests: u64,
) -> AppResult<Vec<ExecutionOutcome>> {
    debug!(total_requests, "Running non-blocking discipline");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    Ok(runtime.block_on(async move {
        let mut tasks = JoinSet::new();
        for _ in 0..total_requests {
            let backend = Arc::clone(&backend);
            let spec = Arc::clone(&spec);
            tasks.spawn(async move { backend.execute_async(&spec).await });
        }

        let mut outcomes = Vec::with_capacity(usize::try_from(total_requests).unwrap_or(0));
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    outcomes.push(ExecutionOutcome::failure(format!("task failed: {}", err)));
                }
            }
        }
        outcomes
    }))
}
