//! Runtime configuration, read from the process environment.
//!
//! A `.env` file in the working directory is honoured.
//!
//! # Variables
//!
//! ## Required
//! - `EMPORIUM_API_URL` - Base URL of the backend serving `/api/{resource}`
//!
//! ## Optional
//! - `EMPORIUM_API_TOKEN` - Bearer token sent with every request
//! - `EMPORIUM_HTTP_TIMEOUT_SECS` - Transport timeout (default: 30)
//! - `EMPORIUM_NOT_FOUND_ROUTE` - Redirect target for unknown entities (default: 404)
//! - `SENTRY_DSN` - Sentry project DSN; error reporting is off without it
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::BTreeSet;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::resolve::NOT_FOUND_ROUTE;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const MIN_TOKEN_LEN: usize = 20;
const MIN_DISTINCT_TOKEN_CHARS: usize = 8;

/// Substrings that mark a token copied from documentation rather than issued.
const SAMPLE_TOKEN_MARKERS: &[&str] = &[
    "changeme",
    "dummy",
    "sample",
    "secret",
    "test-token",
    "your_",
    "your-",
];

/// Why the environment could not be turned into a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingEnvVar(String),
    #[error("{0} is invalid: {1}")]
    InvalidEnvVar(String, String),
    #[error("{0} looks unsafe: {1}")]
    InsecureSecret(String, String),
}

/// Settings shared by every admin front end.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Route navigated to when a resolver finds no entity
    pub not_found_route: String,
    /// Where error reports are sent
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; always ends with `/` so resource paths join beneath it
    pub base_url: Url,
    /// Bearer token for authenticated backends
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Build an API configuration for `base_url` with no token and the
    /// default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("EMPORIUM_API_URL", base_url)?,
            token: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url("EMPORIUM_API_URL", &get_required_env("EMPORIUM_API_URL")?)?;

        let timeout_secs = get_env_or_default(
            "EMPORIUM_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("EMPORIUM_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let token = get_optional_env("EMPORIUM_API_TOKEN").map(|token| {
            if let Err(e) = check_token("EMPORIUM_API_TOKEN", &token) {
                tracing::warn!("{e}");
            }
            SecretString::from(token)
        });

        Ok(Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl AdminConfig {
    /// Read the configuration, after merging in `.env` if one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is the normal case in deployments
        let _ = dotenvy::dotenv();

        Ok(Self {
            api: ApiConfig::from_env()?,
            not_found_route: get_env_or_default("EMPORIUM_NOT_FOUND_ROUTE", NOT_FOUND_ROUTE),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Unset and empty are both treated as absent.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an absolute base URL, appending the trailing slash `Url::join` needs.
fn parse_base_url(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("{raw} cannot be used as a base URL"),
        ));
    }
    Ok(url)
}

/// Reject bearer tokens that are short, repetitive or copied from samples.
fn check_token(var_name: &str, token: &str) -> Result<(), ConfigError> {
    let unsafe_token = |reason: String| Err(ConfigError::InsecureSecret(var_name.to_string(), reason));

    let lowered = token.to_ascii_lowercase();
    if let Some(marker) = SAMPLE_TOKEN_MARKERS.iter().find(|m| lowered.contains(**m)) {
        return unsafe_token(format!("contains the sample marker {marker:?}"));
    }

    let len = token.chars().count();
    if len < MIN_TOKEN_LEN {
        return unsafe_token(format!("{len} characters, expected at least {MIN_TOKEN_LEN}"));
    }

    let distinct = token.chars().collect::<BTreeSet<_>>().len();
    if distinct < MIN_DISTINCT_TOKEN_CHARS {
        return unsafe_token(format!(
            "only {distinct} distinct characters, expected at least {MIN_DISTINCT_TOKEN_CHARS}"
        ));
    }

    Ok(())
}
