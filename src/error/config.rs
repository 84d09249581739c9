use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Missing target URL (set --url or provide in config).")]
    MissingUrl,
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid header '{value}'. Use 'Name: value'.")]
    InvalidHeader { value: String },
    #[error("Unknown backend '{id}'. Known backends: {known}.")]
    UnknownBackend { id: String, known: String },
    #[error("Concurrency must be >= 1.")]
    ConcurrencyMustBePositive,
    #[error("Concurrency must be <= {max}.")]
    ConcurrencyTooLarge { max: usize },
    #[error("Request count must be >= 1 when set.")]
    RequestCountMustBePositive,
    #[error("Duration must be >= 1 second.")]
    DurationZero,
    #[error("Duration must be <= {max} seconds.")]
    DurationTooLarge { max: u64 },
}
