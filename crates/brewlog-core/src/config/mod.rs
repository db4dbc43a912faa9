//! API client configuration.
//!
//! Provides the `ApiConfig` struct used by the CLI (and any other front end)
//! to reach the catalog API: base URL, bearer token and request timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Default request timeout, after which the server is considered unreachable.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "BREWLOG_API_URL";
/// Environment variable holding the bearer access token.
pub const API_TOKEN_ENV: &str = "BREWLOG_API_TOKEN";
/// Environment variable overriding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "BREWLOG_TIMEOUT_MS";

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Remote API settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://tea.example.com/api` (no trailing slash)
    pub base_url: String,
    /// Bearer access token; authentication itself is handled elsewhere
    #[serde(default)]
    pub access_token: Option<String>,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ApiConfig {
    /// Build a config for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.into())?,
            access_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = normalize_text_option(Some(token.into()));
        self
    }

    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Request timeout as a `Duration`.
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve configuration from `BREWLOG_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = normalize_text_option(lookup(API_URL_ENV))
            .ok_or_else(|| Error::Config(format!("{API_URL_ENV} is not set")))?;

        let mut config = Self::new(base_url)?;
        if let Some(token) = lookup(API_TOKEN_ENV) {
            config = config.with_access_token(token);
        }
        if let Some(raw) = normalize_text_option(lookup(TIMEOUT_ENV)) {
            let timeout_ms = raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("{TIMEOUT_ENV} must be a number of milliseconds"))
            })?;
            config = config.with_timeout_ms(timeout_ms);
        }
        Ok(config)
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let value = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::Config("API base URL must not be empty".to_string()))?;
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(
            "API base URL must include http:// or https://".to_string(),
        ))
    }
}
