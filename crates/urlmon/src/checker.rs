//! Fetch-and-hash checker
//!
//! One check is one HTTP GET bounded by the target's timeout, fingerprinted
//! and folded into a [`CheckResult`]. The checker performs exactly one
//! attempt per call, holds no shared mutable state, and never returns an
//! error: timeouts, connection failures, and error statuses all become the
//! failure variant of the result.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, USER_AGENT};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::CheckTarget;
use crate::error::FetchError;
use crate::fingerprint::Fingerprinter;
use crate::result::{CheckResult, CheckState, LengthField, StatusField};
use crate::{DEFAULT_USER_AGENT, EXCERPT_LIMIT};

/// Trait for components that produce the next result for a target
///
/// The host side (monitor, CLI) calls this on its own schedule; the checker
/// suspends the caller until the fetch completes or times out.
#[async_trait]
pub trait ContentChecker: Send + Sync {
    /// Perform one fetch-and-hash check
    async fn check(&self, target: &CheckTarget) -> CheckResult;
}

/// A response that was actually received, whatever its status
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// `content-length` response header, verbatim
    pub content_length: Option<String>,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl RawResponse {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8 text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// reqwest-backed checker
///
/// Parameterized by the fingerprint form so the same fetch path serves both
/// the short-MD5 sensor checks and the full-SHA-256 batch checks.
#[derive(Debug, Clone)]
pub struct HttpChecker {
    fingerprinter: Fingerprinter,
    user_agent: String,
}

impl HttpChecker {
    /// Create a checker with the short fingerprint form
    pub fn new() -> Self {
        Self {
            fingerprinter: Fingerprinter::short(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Replace the fingerprinter
    pub fn with_fingerprinter(mut self, fingerprinter: Fingerprinter) -> Self {
        self.fingerprinter = fingerprinter;
        self
    }

    /// Replace the User-Agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The configured fingerprinter
    pub fn fingerprinter(&self) -> Fingerprinter {
        self.fingerprinter
    }

    /// Issue one GET and return the response with its raw body
    ///
    /// Returns `Ok` for any received response, including error statuses;
    /// `Err` only when no response exists at all (timeout, connection or
    /// request failure). The timeout bounds the whole request, connect
    /// through body read, and is the sole cancellation mechanism; the
    /// client and any in-flight connection are dropped on every exit path.
    pub async fn fetch_raw(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<RawResponse, FetchError> {
        let mut header_map = HeaderMap::new();
        header_map.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        for (key, value) in headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| FetchError::Request(format!("invalid header name: {key}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| FetchError::Request(format!("invalid header value for {key}")))?;
            header_map.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(header_map)
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;

        let response = client.get(url).send().await.map_err(FetchError::from_reqwest)?;

        let status = response.status().as_u16();
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.bytes().await.map_err(|err| {
            if err.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::BodyRead(err.to_string())
            }
        })?;

        debug!(url, status, size = body.len(), "Fetched");

        Ok(RawResponse {
            status,
            content_length,
            body: body.to_vec(),
        })
    }
}

impl Default for HttpChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentChecker for HttpChecker {
    async fn check(&self, target: &CheckTarget) -> CheckResult {
        let outcome = self
            .fetch_raw(&target.url, &target.headers, target.timeout())
            .await;

        match outcome {
            Ok(raw) if raw.is_success() => {
                let text = raw.text();
                CheckResult {
                    state: CheckState::Fingerprint(self.fingerprinter.digest(text.as_bytes())),
                    error: String::new(),
                    extract: excerpt(&text),
                    status_code: StatusField::Code(raw.status),
                    content_length: LengthField::from_header(
                        raw.content_length.as_deref(),
                        LengthField::Unknown,
                    ),
                    timeout: target.timeout_secs,
                    interval: target.interval_secs,
                }
            }
            Ok(raw) => {
                let message = status_message(raw.status);
                error!(url = %target.url, status = raw.status, "Error fetching data");
                CheckResult {
                    state: CheckState::Unavailable,
                    error: excerpt(&message),
                    extract: String::new(),
                    status_code: StatusField::Code(raw.status),
                    content_length: LengthField::from_header(
                        raw.content_length.as_deref(),
                        LengthField::Error,
                    ),
                    timeout: target.timeout_secs,
                    interval: target.interval_secs,
                }
            }
            Err(err) => {
                error!(url = %target.url, error = %err, "Error fetching data");
                CheckResult {
                    state: CheckState::Unavailable,
                    error: excerpt(&err.to_string()),
                    extract: String::new(),
                    status_code: StatusField::Error,
                    content_length: LengthField::Error,
                    timeout: target.timeout_secs,
                    interval: target.interval_secs,
                }
            }
        }
    }
}

/// Truncate text to the excerpt limit, counting characters
pub fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_LIMIT).collect()
}

fn status_message(status: u16) -> String {
    match reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("HTTP status {status} {reason}"),
        None => format!("HTTP status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_input_verbatim() {
        assert_eq!(excerpt("hello"), "hello");
        assert_eq!(excerpt(""), "");
    }

    #[test]
    fn test_excerpt_truncates_to_limit() {
        let long = "x".repeat(500);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_LIMIT);
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let long: String = "é".repeat(300);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_LIMIT);
    }

    #[test]
    fn test_status_message() {
        assert_eq!(status_message(500), "HTTP status 500 Internal Server Error");
        assert_eq!(status_message(404), "HTTP status 404 Not Found");
        assert_eq!(status_message(599), "HTTP status 599");
    }

    #[test]
    fn test_raw_response_success_range() {
        let mut raw = RawResponse {
            status: 204,
            content_length: None,
            body: Vec::new(),
        };
        assert!(raw.is_success());
        raw.status = 301;
        assert!(!raw.is_success());
        raw.status = 404;
        assert!(!raw.is_success());
    }
}
