//! Target configuration
//!
//! A [`TargetConfig`] is the raw, serde-friendly form a target arrives in:
//! the URL, an optional `key:value|key:value` header string, and optional
//! interval/timeout seconds. Building it into a [`CheckTarget`] validates
//! the URL, parses the headers, and fills in defaults; the checker only ever
//! sees validated targets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fingerprint::Fingerprinter;
use crate::validate::{is_valid_url, validate_input};
use crate::{DEFAULT_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS};

/// Raw target configuration as entered by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// The URL to watch (required, absolute, with scheme and host)
    pub url: String,

    /// Header string in `key:value|key:value` form (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,

    /// Check interval in seconds (optional, default 3600)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,

    /// Per-fetch timeout in seconds (optional, default 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl TargetConfig {
    /// Create a config for the given URL with defaults for everything else
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the raw header string
    pub fn headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    /// Set the check interval in seconds
    pub fn interval(mut self, secs: u64) -> Self {
        self.interval = Some(secs);
        self
    }

    /// Set the per-fetch timeout in seconds
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout = Some(secs);
        self
    }

    /// Validate and build the target
    ///
    /// Runs the field validator first so the error reflects the same checks
    /// a config form would report, then parses the header string.
    pub fn build(self) -> Result<CheckTarget, ConfigError> {
        let raw_headers = self.headers.unwrap_or_default();
        let errors = validate_input(&self.url, &raw_headers);
        if errors.contains_key("url") {
            return Err(ConfigError::InvalidUrl(self.url));
        }
        if errors.contains_key("headers") {
            return Err(ConfigError::InvalidHeaders(raw_headers));
        }

        let headers = if raw_headers.trim().is_empty() {
            Vec::new()
        } else {
            parse_headers(&raw_headers)?
        };

        Ok(CheckTarget {
            url: self.url,
            headers,
            interval_secs: self.interval.unwrap_or(DEFAULT_INTERVAL_SECS),
            timeout_secs: self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Parse a `key:value|key:value` header string into pairs
///
/// Splits each entry on the first colon and trims both sides, so header
/// values may contain colons. An entry without a colon, or with an empty
/// key or value after trimming, is rejected.
pub fn parse_headers(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split('|')
        .map(|entry| {
            let (key, value) = entry
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidHeaders(entry.to_string()))?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(ConfigError::InvalidHeaders(entry.to_string()));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

/// A validated watch target
///
/// Identity is the URL; a target is immutable for the life of the
/// integration instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTarget {
    /// The URL to fetch
    pub url: String,
    /// Parsed request headers
    pub headers: Vec<(String, String)>,
    /// Check interval in seconds
    pub interval_secs: u64,
    /// Per-fetch timeout in seconds
    pub timeout_secs: u64,
}

impl CheckTarget {
    /// Build a target from raw input, applying defaults
    pub fn from_input(
        url: &str,
        headers: &str,
        interval: Option<u64>,
        timeout: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let mut config = TargetConfig::new(url);
        if !headers.is_empty() {
            config = config.headers(headers);
        }
        config.interval = interval;
        config.timeout = timeout;
        config.build()
    }

    /// The per-fetch timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The check interval
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Stable identifier derived from the URL (8 hex chars of its MD5)
    pub fn unique_id(&self) -> String {
        Fingerprinter::short().digest(self.url.as_bytes())
    }

    /// Whether the URL is still a valid absolute URL
    pub fn is_valid(&self) -> bool {
        is_valid_url(&self.url)
    }
}
