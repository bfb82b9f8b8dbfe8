//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `COMANDA_API_URL` - Backend base URL (default: `http://127.0.0.1:5000/`)
//! - `COMANDA_POLL_INTERVAL_SECS` - Order dashboard refresh period (default: 10)
//! - `COMANDA_HISTORY_LIMIT` - History entries shown on the dashboard (default: 10)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: Url,
    /// Dashboard refresh period
    pub poll_interval: Duration,
    /// Maximum number of history entries rendered
    pub history_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads a `.env` file first when one exists.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = match lookup("COMANDA_API_URL") {
            Some(raw) => Url::parse(raw.trim()).map_err(|e| {
                ConfigError::InvalidEnvVar("COMANDA_API_URL".to_string(), e.to_string())
            })?,
            None => default_api_url(),
        };

        let poll_secs = parse_optional(&lookup, "COMANDA_POLL_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "COMANDA_POLL_INTERVAL_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let history_limit =
            parse_optional(&lookup, "COMANDA_HISTORY_LIMIT")?.unwrap_or(DEFAULT_HISTORY_LIMIT);

        Ok(Self {
            api_url,
            poll_interval: Duration::from_secs(poll_secs),
            history_limit,
        })
    }
}

/// Read a required variable from the environment.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` when the variable is unset or blank.
pub fn required_var(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}
