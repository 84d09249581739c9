mod app;
mod backend;
mod config;

pub use app::{AppError, AppResult};
pub use backend::BackendError;
pub use config::ConfigError;
