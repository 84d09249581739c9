//! Request-execution backend contract and registry.
//!
//! A backend knows how to perform one HTTP call and report a structured
//! outcome. The engine treats every backend uniformly through the
//! [`Backend`] trait; expected failure categories (timeout, connection
//! refused, TLS failure) are translated into failed outcomes and never
//! surface as errors.
mod reqwest_async;
mod reqwest_blocking;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::{BenchmarkConfiguration, SchedulingMode};
use crate::error::{AppError, AppResult, BackendError, ConfigError};

pub use reqwest_async::ReqwestBackend;
pub use reqwest_blocking::ReqwestBlockingBackend;

/// Resolved, backend-agnostic description of the single HTTP call a run
/// repeats. Derived once from the configuration and shared immutably.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: crate::config::HttpMethod,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
    pub verify_tls: bool,
}

impl RequestSpec {
    /// Resolves the request template from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` when the target URL does not parse.
    pub fn from_configuration(config: &BenchmarkConfiguration) -> Result<Self, ConfigError> {
        let url = Url::parse(&config.url).map_err(|err| ConfigError::InvalidUrl {
            url: config.url.clone(),
            source: err,
        })?;
        Ok(Self {
            method: config.method,
            url,
            headers: config.headers.clone(),
            body: config.body.clone(),
            timeout: config.timeout,
            verify_tls: config.verify_tls,
        })
    }
}

/// The structured result of one request attempt.
///
/// `status` is present iff a response was received; `error` is present iff
/// `success` is false. A total failure before any response existed carries
/// neither status nor a zero status. Failures record no elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub elapsed: Duration,
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl ExecutionOutcome {
    #[must_use]
    pub const fn success(status: u16, elapsed: Duration) -> Self {
        Self {
            success: true,
            elapsed,
            status: Some(status),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            elapsed: Duration::ZERO,
            status: None,
            error: Some(error.into()),
        }
    }
}

/// One request-execution capability provider.
///
/// A backend may support only one scheduling mode; the engine rejects an
/// unsupported mode/backend combination before any request is issued, so
/// the default method bodies are a backstop, not a fallback path.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn supports(&self, mode: SchedulingMode) -> bool;

    /// Performs one HTTP call on the calling thread.
    fn execute(&self, spec: &RequestSpec) -> ExecutionOutcome {
        let _ = spec;
        ExecutionOutcome::failure(format!(
            "backend '{}' does not support blocking execution",
            self.name()
        ))
    }

    /// Performs one HTTP call cooperatively, yielding at I/O waits.
    async fn execute_async(&self, spec: &RequestSpec) -> ExecutionOutcome {
        let _ = spec;
        ExecutionOutcome::failure(format!(
            "backend '{}' does not support non-blocking execution",
            self.name()
        ))
    }

    /// Releases any long-lived resources (connection pools, sessions).
    fn shutdown(&self) {}
}

type BackendFactory =
    Box<dyn Fn(&BenchmarkConfiguration) -> Result<Arc<dyn Backend>, BackendError> + Send + Sync>;

/// Mapping from backend identifier to backend constructor.
///
/// Unknown identifiers fail fast; construction itself runs once per run so
/// a failed connection-pool build surfaces as a run-level error.
pub struct BackendRegistry {
    factories: BTreeMap<String, BackendFactory>,
}

impl BackendRegistry {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry pre-populated with the built-in reqwest backends.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("reqwest", |config| {
            Ok(Arc::new(ReqwestBackend::from_configuration(config)?) as Arc<dyn Backend>)
        });
        registry.register("reqwest-blocking", |config| {
            Ok(Arc::new(ReqwestBlockingBackend::from_configuration(config)?) as Arc<dyn Backend>)
        });
        registry
    }

    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn(&BenchmarkConfiguration) -> Result<Arc<dyn Backend>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Constructs the backend selected by `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBackend` for an unregistered identifier
    /// and `BackendError::BuildClientFailed` when construction fails.
    pub fn resolve(&self, config: &BenchmarkConfiguration) -> AppResult<Arc<dyn Backend>> {
        let factory = self.factories.get(&config.backend).ok_or_else(|| {
            AppError::config(ConfigError::UnknownBackend {
                id: config.backend.clone(),
                known: self.ids().join(", "),
            })
        })?;
        factory(config).map_err(AppError::backend)
    }
}
