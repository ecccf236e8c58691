//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QKART_API_ENDPOINT` - Base URL of the QKart backend (e.g. `https://qkart.example.com/api/v1`)
//!
//! ## Optional
//! - `QKART_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `QKART_CATALOG_TTL_SECS` - How long the product catalog is cached (default: 300)
//! - `QKART_SESSION_FILE` - Where the CLI keeps the logged-in session (default: .qkart-session.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "15";
const DEFAULT_CATALOG_TTL_SECS: &str = "300";
const DEFAULT_SESSION_FILE: &str = ".qkart-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// QKart client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is appended to
    pub endpoint: Url,
    /// Timeout applied to each backend request
    pub request_timeout: Duration,
    /// Time-to-live of the cached product catalog
    pub catalog_ttl: Duration,
    /// Location of the persisted session (used by the CLI)
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let endpoint = parse_endpoint(
            "QKART_API_ENDPOINT",
            &get_required_env("QKART_API_ENDPOINT")?,
        )?;
        let request_timeout = parse_secs(
            "QKART_REQUEST_TIMEOUT_SECS",
            &get_env_or_default("QKART_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
        )?;
        let catalog_ttl = parse_secs(
            "QKART_CATALOG_TTL_SECS",
            &get_env_or_default("QKART_CATALOG_TTL_SECS", DEFAULT_CATALOG_TTL_SECS),
        )?;
        let session_file =
            PathBuf::from(get_env_or_default("QKART_SESSION_FILE", DEFAULT_SESSION_FILE));

        Ok(Self {
            endpoint,
            request_timeout,
            catalog_ttl,
            session_file,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at `endpoint` with every other setting at its default.
    #[must_use]
    pub fn with_endpoint(endpoint: Url) -> Self {
        Self {
            endpoint,
            request_timeout: Duration::from_secs(15),
            catalog_ttl: Duration::from_secs(300),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating an empty value as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the backend base URL. Only http and https are accepted.
fn parse_endpoint(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

/// Parse a whole number of seconds into a `Duration`.
fn parse_secs(var_name: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint_https() {
        let url = parse_endpoint("TEST", "https://qkart.example.com/api/v1").unwrap();
        assert_eq!(url.path(), "/api/v1");
    }

    #[test]
    fn test_parse_endpoint_rejects_garbage() {
        let err = parse_endpoint("TEST", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "TEST"));
    }

    #[test]
    fn test_parse_endpoint_rejects_other_schemes() {
        let err = parse_endpoint("TEST", "ftp://qkart.example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("TEST", "30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_secs("TEST", " 5 ").unwrap(), Duration::from_secs(5));
        assert!(parse_secs("TEST", "-1").is_err());
        assert!(parse_secs("TEST", "soon").is_err());
    }

    #[test]
    fn test_with_endpoint_defaults() {
        let config = ClientConfig::with_endpoint(Url::parse("http://localhost:8082/api/v1").unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.catalog_ttl, Duration::from_secs(300));
        assert_eq!(config.session_file, PathBuf::from(".qkart-session.json"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_env_var_message() {
        let err = ConfigError::MissingEnvVar("QKART_API_ENDPOINT".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: QKART_API_ENDPOINT"
        );
    }
}
