use thiserror::Error;

use crate::config::SchedulingMode;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend '{backend}' does not support {mode} execution.")]
    UnsupportedMode {
        backend: String,
        mode: SchedulingMode,
    },
    #[error("Failed to build HTTP client for backend '{backend}': {source}")]
    BuildClientFailed {
        backend: String,
        #[source]
        source: reqwest::Error,
    },
}
