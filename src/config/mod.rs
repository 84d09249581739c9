//! Benchmark configuration: value types, validation, and file loading.
mod loader;
mod types;


pub use loader::{ConfigFile, load_config, load_config_file};
pub use types::{
    BenchmarkConfiguration, DEFAULT_BACKEND, FIXED_REQUEST_MULTIPLIER, HttpMethod, MAX_CONCURRENCY,
    MAX_DURATION_SECONDS, SchedulingMode,
};
