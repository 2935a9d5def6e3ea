//! Client configuration
//!
//! Settings come from CLI arguments, falling back to environment variables and a `.env` file.

use std::path::PathBuf;

use clap::Args;
use thiserror::Error;

/// Errors raised by configuration values that parse but cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Arguments or environment could not be parsed.
    #[error(transparent)]
    Parse(#[from] clap::Error),

    /// The backend URL is not an http(s) URL.
    #[error("backend url must start with http:// or https://, got {0}")]
    InvalidApiUrl(String),

    /// A zero timeout would fail every request.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Backend connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Backend base URL
    #[arg(long, env = "COMPTOIR_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Bearer token sent with every request, needed for staff commands
    #[arg(long, env = "COMPTOIR_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "COMPTOIR_API_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    /// Checks values clap cannot check by itself.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first unusable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(self.api_url.clone()));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}

/// Local cart slot settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// File holding the persisted cart
    #[arg(long, env = "COMPTOIR_CART_PATH", default_value = ".comptoir-cart.json")]
    pub cart_path: PathBuf,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
