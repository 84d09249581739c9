//! Command-line surface of the `httpbench` binary.
use clap::Parser;

use crate::config::{HttpMethod, SchedulingMode};
use crate::error::ConfigError;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "HTTP client benchmarking engine - swappable request backends, blocking and non-blocking concurrency disciplines, latency percentiles, and host resource sampling."
)]
pub struct BenchArgs {
    /// Target URL to benchmark
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// HTTP method
    #[arg(short = 'm', long, value_enum)]
    pub method: Option<HttpMethod>,

    /// Request header as 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(short = 'd', long = "data")]
    pub data: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Number of concurrent workers or tasks
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Total number of requests (defaults to concurrency x 10)
    #[arg(short = 'n', long)]
    pub requests: Option<u64>,

    /// Duration bound in seconds, used as the throughput denominator
    #[arg(short = 't', long)]
    pub duration: Option<u64>,

    /// Scheduling discipline
    #[arg(long, value_enum)]
    pub mode: Option<SchedulingMode>,

    /// Request-execution backend identifier
    #[arg(short = 'b', long)]
    pub backend: Option<String>,

    /// Benchmark name recorded in the result
    #[arg(long)]
    pub name: Option<String>,

    /// Config file path (.toml or .json)
    #[arg(long)]
    pub config: Option<String>,

    /// Print the full result as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ConfigError> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(ConfigError::InvalidHeader {
            value: s.to_owned(),
        }),
    }
}
