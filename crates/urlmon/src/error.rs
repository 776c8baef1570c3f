//! Error types for urlmon

use thiserror::Error;

/// Errors raised while building or parsing configuration
///
/// These are reported at configuration time; an invalid target is never
/// handed to the checker.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL does not parse to an absolute URL with scheme and host
    #[error("Invalid URL: {0:?}")]
    InvalidUrl(String),

    /// Header string entry is malformed
    #[error("Invalid header entry: {0:?}")]
    InvalidHeaders(String),

    /// A target with the same URL is already registered
    #[error("Target already configured: {0}")]
    DuplicateTarget(String),

    /// Batch entry line has no URL
    #[error("Empty batch entry")]
    EmptyBatchEntry,

    /// Config file could not be read or parsed
    #[error("Failed to load config file: {0}")]
    ConfigFile(String),
}

/// Fetch failures where no HTTP response was received at all
///
/// A response with an error status is not a `FetchError`; it is a response,
/// and the caller decides what to make of its status.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build the HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to the server
    #[error("Failed to connect to server")]
    Connect(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Response arrived but the body could not be read in time
    #[error("Failed to read response body: {0}")]
    BodyRead(String),
}

impl FetchError {
    /// Classify a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connect(err)
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// Errors reading or writing the previous-state file
#[derive(Debug, Error)]
pub enum StateError {
    /// State file exists but could not be read or written
    #[error("State file I/O error at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// State file contents are not a valid JSON object of strings
    #[error("State file {path} is not valid JSON")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
