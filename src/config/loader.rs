use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};

use super::types::{BenchmarkConfiguration, HttpMethod, SchedulingMode};

/// Optional overrides read from an `httpbench.toml` / `httpbench.json` file.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub name: Option<String>,
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub headers: Option<BTreeMap<String, String>>,
    pub body: Option<String>,
    pub timeout: Option<u64>,
    pub verify_tls: Option<bool>,
    #[serde(alias = "connections")]
    pub concurrency: Option<usize>,
    pub requests: Option<u64>,
    pub duration: Option<u64>,
    pub mode: Option<SchedulingMode>,
    pub backend: Option<String>,
}

impl ConfigFile {
    /// Applies every present field onto `config`.
    pub fn apply(self, config: &mut BenchmarkConfiguration) {
        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(headers) = self.headers {
            config.headers.extend(headers);
        }
        if let Some(body) = self.body {
            config.body = Some(body.into_bytes());
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Duration::from_secs(timeout);
        }
        if let Some(verify_tls) = self.verify_tls {
            config.verify_tls = verify_tls;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(requests) = self.requests {
            config.total_requests = Some(requests);
        }
        if let Some(duration) = self.duration {
            config.duration_seconds = duration;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
    }
}

/// Loads a configuration file from the provided path or default locations.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    if let Some(path) = path {
        let path = PathBuf::from(path);
        return Ok(Some(load_config_file(&path)?));
    }

    let toml_path = PathBuf::from("httpbench.toml");
    if toml_path.exists() {
        return Ok(Some(load_config_file(&toml_path)?));
    }

    let json_path = PathBuf::from("httpbench.json");
    if json_path.exists() {
        return Ok(Some(load_config_file(&json_path)?));
    }

    Ok(None)
}

/// Reads and parses one config file, dispatching on its extension.
///
/// # Errors
///
/// Returns an error when the file cannot be read, the extension is not
/// `.toml` or `.json`, or the content fails to parse.
pub fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}
