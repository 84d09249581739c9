//! Binary entry point: argument/config merge, engine invocation, reporting.
use std::time::Duration;

use clap::Parser;

use crate::args::BenchArgs;
use crate::bench::{BenchmarkResult, Engine};
use crate::client::BackendRegistry;
use crate::config::{BenchmarkConfiguration, load_config};
use crate::error::AppResult;

/// Parses the CLI, merges the optional config file, runs one benchmark,
/// and reports the result.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unknown backend, an
/// unsupported mode/backend combination, or a failed client build. Request
/// failures do not surface here; they are part of the result.
pub fn run() -> AppResult<()> {
    let args = BenchArgs::parse();
    crate::logger::init_logging(args.verbose);

    let config = build_configuration(&args)?;
    let engine = Engine::new(BackendRegistry::builtin());
    let result = engine.run(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }
    Ok(())
}

/// Defaults, overlaid by the config file, overlaid by explicit CLI options.
fn build_configuration(args: &BenchArgs) -> AppResult<BenchmarkConfiguration> {
    let mut config = BenchmarkConfiguration::default();
    if let Some(file) = load_config(args.config.as_deref())? {
        file.apply(&mut config);
    }

    if let Some(url) = &args.url {
        config.url = url.clone();
    }
    if let Some(method) = args.method {
        config.method = method;
    }
    config.headers.extend(args.headers.iter().cloned());
    if let Some(data) = &args.data {
        config.body = Some(data.clone().into_bytes());
    }
    if let Some(timeout) = args.timeout {
        config.timeout = Duration::from_secs(timeout);
    }
    if args.insecure {
        config.verify_tls = false;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(requests) = args.requests {
        config.total_requests = Some(requests);
    }
    if let Some(duration) = args.duration {
        config.duration_seconds = duration;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(backend) = &args.backend {
        config.backend = backend.clone();
    }
    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    Ok(config)
}

fn print_summary(result: &BenchmarkResult) {
    let stats = &result.statistics;
    println!("Benchmark:        {}", result.name);
    println!(
        "Target:           {} {} via {}",
        result.method, result.url, result.backend
    );
    println!("Requests:         {}", stats.requests_count);
    println!("Requests/sec:     {:.2}", stats.requests_per_second);
    println!(
        "Latency (s):      min {:.4} / avg {:.4} / max {:.4}",
        stats.min_response_time, stats.avg_response_time, stats.max_response_time
    );
    println!(
        "Percentiles (s):  p95 {:.4} / p99 {:.4}",
        stats.p95_response_time, stats.p99_response_time
    );
    println!(
        "Errors:           {} ({:.1}%)",
        stats.error_count, stats.error_rate
    );
    println!(
        "CPU / memory:     {:.1}% / {:.1}% (avg of run boundary snapshots)",
        result.cpu_usage_avg, result.memory_usage_avg
    );
    println!(
        "Network:          {} B sent / {} B received",
        result.network_io.bytes_sent, result.network_io.bytes_recv
    );
}
