//! Configuration for the Taskboard client.
//!
//! Configuration can be set via environment variables:
//! - `TASKBOARD_API_URL` - Optional. Base URL of the Taskboard backend. Defaults to `http://localhost:8000`.
//! - `TASKBOARD_TOKEN_FILE` - Optional. Path of the persisted session tokens. Defaults to `~/.taskboard/credentials.json`.
//! - `TASKBOARD_REQUEST_TIMEOUT_SECS` - Optional. Timeout for API requests. Defaults to `10`.
//! - `TASKBOARD_REFRESH_TIMEOUT_SECS` - Optional. Timeout for the token refresh call. Defaults to `5`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Taskboard backend
    pub base_url: Url,

    /// Timeout applied to every API request
    pub request_timeout: Duration,

    /// Tighter timeout for the token refresh call, so a hung refresh
    /// does not pin every queued request behind it
    pub refresh_timeout: Duration,

    /// Where the session tokens are persisted between runs
    pub token_file: PathBuf,
}

impl ClientConfig {
    /// Create a config for the given backend URL with default timeouts.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidValue("base_url".to_string(), format!("{}", e)))?;

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            refresh_timeout: Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECS),
            token_file: default_token_file(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the URL or a timeout
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("TASKBOARD_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidValue("TASKBOARD_API_URL".to_string(), format!("{}", e))
        })?;

        let request_timeout = timeout_from_env(
            "TASKBOARD_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let refresh_timeout = timeout_from_env(
            "TASKBOARD_REFRESH_TIMEOUT_SECS",
            DEFAULT_REFRESH_TIMEOUT_SECS,
        )?;

        let token_file = std::env::var("TASKBOARD_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_token_file());

        Ok(Self {
            base_url,
            request_timeout,
            refresh_timeout,
            token_file,
        })
    }
}

fn timeout_from_env(var: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    let secs = std::env::var(var)
        .unwrap_or_else(|_| default_secs.to_string())
        .parse()
        .map_err(|e| ConfigError::InvalidValue(var.to_string(), format!("{}", e)))?;
    Ok(Duration::from_secs(secs))
}

fn default_token_file() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".taskboard")
        .join("credentials.json")
}

// ==================== Tests ====================
