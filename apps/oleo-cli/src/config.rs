//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading: required variables must be present and valid or the
//! process exits with a clear error before touching the database or the
//! credential provider.

use std::env;

use thiserror::Error;

use oleo_provider::RestProviderConfig;

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console output.
    Text,
    /// JSON lines for log aggregation.
    Json,
}

impl LogFormat {
    fn from_env_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                var: "LOG_FORMAT".to_string(),
                message: format!("expected 'text' or 'json', got '{other}'"),
            }),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,

    /// Base URL of the credential provider API.
    pub provider_base_url: String,

    /// API key for the credential provider.
    pub provider_api_key: String,

    /// Connect timeout for provider requests, in seconds.
    pub provider_connect_timeout_secs: u64,

    /// Read timeout for provider requests, in seconds.
    pub provider_read_timeout_secs: u64,

    /// Tracing filter directive (e.g. "info,oleo=debug").
    pub rust_log: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[redacted]")
            .field("provider_base_url", &self.provider_base_url)
            .field("provider_api_key", &"[redacted]")
            .field(
                "provider_connect_timeout_secs",
                &self.provider_connect_timeout_secs,
            )
            .field(
                "provider_read_timeout_secs",
                &self.provider_read_timeout_secs,
            )
            .field("rust_log", &self.rust_log)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required Variables
    ///
    /// - `DATABASE_URL` - PostgreSQL connection string
    /// - `PROVIDER_BASE_URL` - Credential provider endpoint
    /// - `PROVIDER_API_KEY` - Credential provider API key
    ///
    /// # Optional Variables
    ///
    /// - `RUST_LOG` - Log filter (default: "info")
    /// - `LOG_FORMAT` - "text" or "json" (default: "text")
    /// - `PROVIDER_CONNECT_TIMEOUT_SECS` - default: 10
    /// - `PROVIDER_READ_TIMEOUT_SECS` - default: 30
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development only)
        let _ = dotenvy::dotenv();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let provider_base_url = env::var("PROVIDER_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("PROVIDER_BASE_URL".to_string()))?;

        let provider_api_key = env::var("PROVIDER_API_KEY")
            .map_err(|_| ConfigError::MissingVar("PROVIDER_API_KEY".to_string()))?;

        let provider_connect_timeout_secs =
            parse_secs("PROVIDER_CONNECT_TIMEOUT_SECS", 10)?;
        let provider_read_timeout_secs = parse_secs("PROVIDER_READ_TIMEOUT_SECS", 30)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format =
            LogFormat::from_env_str(&env::var("LOG_FORMAT").unwrap_or_default())?;

        Ok(Config {
            database_url,
            provider_base_url,
            provider_api_key,
            provider_connect_timeout_secs,
            provider_read_timeout_secs,
            rust_log,
            log_format,
        })
    }

    /// Provider configuration derived from this config.
    #[must_use]
    pub fn provider(&self) -> RestProviderConfig {
        let mut config =
            RestProviderConfig::new(&self.provider_base_url, &self.provider_api_key);
        config.connect_timeout_secs = self.provider_connect_timeout_secs;
        config.read_timeout_secs = self.provider_read_timeout_secs;
        config
    }
}

fn parse_secs(var: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Err(_) => Ok(default),
        Ok(s) => s.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("expected a number of seconds, got '{s}'"),
        }),
    }
}
