use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{BenchmarkConfiguration, SchedulingMode};
use crate::error::BackendError;

use super::{Backend, ExecutionOutcome, RequestSpec};

/// Non-blocking backend over the async `reqwest::Client`.
///
/// The client owns its connection pool for the backend's lifetime; TLS
/// verification is fixed at construction because it is a client-level
/// setting in reqwest.
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    /// Builds the underlying client from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::BuildClientFailed` when the client (and its
    /// connection pool) cannot be constructed.
    pub fn from_configuration(config: &BenchmarkConfiguration) -> Result<Self, BackendError> {
        let mut builder = Client::builder().timeout(config.timeout);
        if !config.verify_tls {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        let client = builder
            .build()
            .map_err(|err| BackendError::BuildClientFailed {
                backend: "reqwest".to_owned(),
                source: err,
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Backend for ReqwestBackend {
    fn name(&self) -> &str {
        "reqwest"
    }

    fn supports(&self, mode: SchedulingMode) -> bool {
        matches!(mode, SchedulingMode::NonBlocking)
    }

    async fn execute_async(&self, spec: &RequestSpec) -> ExecutionOutcome {
        let mut request = self
            .client
            .request(spec.method.as_reqwest(), spec.url.clone())
            .timeout(spec.timeout);
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            request = request.body(body.clone());
        }

        let start = Instant::now();
        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                // Elapsed covers the full exchange, body included.
                match response.bytes().await {
                    Ok(_) => ExecutionOutcome::success(status, start.elapsed()),
                    Err(err) => ExecutionOutcome::failure(err.to_string()),
                }
            }
            Err(err) => ExecutionOutcome::failure(err.to_string()),
        }
    }
}
