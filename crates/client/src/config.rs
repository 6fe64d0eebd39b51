//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `SHOPFRONT_BASE_URL` - Backend base URL (default: `http://localhost:8080`)
//! - `SHOPFRONT_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SHOPFRONT_CHECKOUT_CRASH_RATE` - Probability in `[0, 1]` of navigating home
//!   after a checkout transport failure (default: 0, disabled)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL; endpoint paths are resolved against it
    pub base_url: Url,
    /// Timeout applied to every request
    pub request_timeout: Duration,
    /// Debug hook: chance of a simulated page crash when checkout fails in transport
    pub checkout_crash_rate: f64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            checkout_crash_rate: 0.0,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "SHOPFRONT_BASE_URL",
            &get_env_or_default("SHOPFRONT_BASE_URL", DEFAULT_BASE_URL),
        )?;
        let request_timeout = get_optional_env("SHOPFRONT_REQUEST_TIMEOUT_SECS")
            .map(|value| parse_timeout("SHOPFRONT_REQUEST_TIMEOUT_SECS", &value))
            .transpose()?
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        let checkout_crash_rate = get_optional_env("SHOPFRONT_CHECKOUT_CRASH_RATE")
            .map(|value| parse_rate("SHOPFRONT_CHECKOUT_CRASH_RATE", &value))
            .transpose()?
            .unwrap_or(0.0);

        Ok(Self {
            base_url,
            request_timeout,
            checkout_crash_rate,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Replace the base URL (e.g. from a command-line flag).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `value` is not an absolute URL.
    pub fn with_base_url(mut self, value: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url("--base-url", value)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_timeout(key: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than 0".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_rate(key: &str, value: &str) -> Result<f64, ConfigError> {
    let rate = value
        .trim()
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0 and 1 (got {rate})"),
        ));
    }
    Ok(rate)
}
