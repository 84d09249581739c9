use std::time::Instant;

use reqwest::blocking::Client;

use crate::config::{BenchmarkConfiguration, SchedulingMode};
use crate::error::BackendError;

use super::{Backend, ExecutionOutcome, RequestSpec};

/// Blocking backend over `reqwest::blocking::Client`.
///
/// Safe for concurrent use from the engine's worker pool; the client's
/// connection pool is shared across workers.
pub struct ReqwestBlockingBackend {
    client: Client,
}

impl ReqwestBlockingBackend {
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
                backend: "reqwest-blocking".to_owned(),
                source: err,
            })?;
        Ok(Self { client })
    }
}

impl Backend for ReqwestBlockingBackend {
    fn name(&self) -> &str {
        "reqwest-blocking"
    }

    fn supports(&self, mode: SchedulingMode) -> bool {
        matches!(mode, SchedulingMode::Blocking)
    }

    fn execute(&self, spec: &RequestSpec) -> ExecutionOutcome {
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
        match request.send() {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.bytes() {
                    Ok(_) => ExecutionOutcome::success(status, start.elapsed()),
                    Err(err) => ExecutionOutcome::failure(err.to_string()),
                }
            }
            Err(err) => ExecutionOutcome::failure(err.to_string()),
        }
    }
}
