use std::collections::BTreeMap;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Upper bound on worker/task fan-out for one run.
pub const MAX_CONCURRENCY: usize = 10_000;
/// Upper bound on the configured duration used as the throughput denominator.
pub const MAX_DURATION_SECONDS: u64 = 3_600;
/// Requests issued per unit of concurrency when no explicit total is set.
pub const FIXED_REQUEST_MULTIPLIER: u64 = 10;
/// Backend used when none is selected.
pub const DEFAULT_BACKEND: &str = "reqwest-blocking";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    #[must_use]
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the engine schedules concurrent request execution.
///
/// `Blocking` fans out over a bounded pool of OS worker threads;
/// `NonBlocking` fans out cooperative tasks on a single-threaded runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingMode {
    Blocking,
    NonBlocking,
}

impl SchedulingMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SchedulingMode::Blocking => "blocking",
            SchedulingMode::NonBlocking => "non-blocking",
        }
    }
}

impl std::fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of one benchmark run.
///
/// Validated once before any request is issued; the engine never mutates it.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkConfiguration {
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
    pub verify_tls: bool,
    pub concurrency: usize,
    pub total_requests: Option<u64>,
    pub duration_seconds: u64,
    pub mode: SchedulingMode,
    pub backend: String,
}

impl Default for BenchmarkConfiguration {
    fn default() -> Self {
        Self {
            name: "benchmark".to_owned(),
            url: String::new(),
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            body: None,
            timeout: Duration::from_secs(30),
            verify_tls: true,
            concurrency: 10,
            total_requests: None,
            duration_seconds: 30,
            mode: SchedulingMode::Blocking,
            backend: DEFAULT_BACKEND.to_owned(),
        }
    }
}

impl BenchmarkConfiguration {
    /// Checks all bounds that must hold before any request is issued.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an empty or unparseable URL, a
    /// concurrency or request count of zero, or an out-of-range duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        Url::parse(&self.url).map_err(|err| ConfigError::InvalidUrl {
            url: self.url.clone(),
            source: err,
        })?;
        if self.concurrency == 0 {
            return Err(ConfigError::ConcurrencyMustBePositive);
        }
        if self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::ConcurrencyTooLarge {
                max: MAX_CONCURRENCY,
            });
        }
        if self.total_requests == Some(0) {
            return Err(ConfigError::RequestCountMustBePositive);
        }
        if self.duration_seconds == 0 {
            return Err(ConfigError::DurationZero);
        }
        if self.duration_seconds > MAX_DURATION_SECONDS {
            return Err(ConfigError::DurationTooLarge {
                max: MAX_DURATION_SECONDS,
            });
        }
        for name in self.headers.keys() {
            if name.is_empty() {
                return Err(ConfigError::InvalidHeader {
                    value: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Number of requests the engine will issue for this configuration.
    ///
    /// Duration-bound runs issue a fixed batch derived from concurrency
    /// rather than stopping mid-flight.
    #[must_use]
    pub fn resolved_total_requests(&self) -> u64 {
        self.total_requests
            .unwrap_or_else(|| (self.concurrency as u64).saturating_mul(FIXED_REQUEST_MULTIPLIER))
    }
}
