//! urlmon - URL content change monitoring library
//!
//! This crate watches remote resources for content changes by periodically
//! fetching a URL, fingerprinting the response body, and comparing the
//! fingerprint against the previous run.
//!
//! ## Checker
//!
//! The core operation is a single fetch-and-hash check: one HTTP GET bounded
//! by a timeout, producing a [`CheckResult`] that carries either a short
//! content fingerprint or an `unavailable` state with a truncated error
//! excerpt. The checker never fails; every failure mode is folded into the
//! result. [`HttpChecker`] is the reqwest-backed implementation behind the
//! [`ContentChecker`] trait.
//!
//! ## Drivers
//!
//! - [`Monitor`] runs one independent periodic timer per configured target
//!   and records results in a [`WatchRegistry`].
//! - [`run_batch`] performs a one-shot pass over semicolon-delimited entry
//!   lines, diffing full SHA-256 fingerprints against a [`StateStore`] file.

pub mod batch;
pub mod checker;
pub mod config;
mod error;
mod fingerprint;
pub mod monitor;
pub mod registry;
mod result;
pub mod state;
pub mod validate;

pub use batch::{parse_batch_line, parse_batch_lines, run_batch, BatchEntry, BatchReport};
pub use checker::{ContentChecker, HttpChecker, RawResponse};
pub use config::{parse_headers, CheckTarget, TargetConfig};
pub use error::{ConfigError, FetchError, StateError};
pub use fingerprint::{Fingerprinter, HashAlgorithm};
pub use monitor::Monitor;
pub use registry::{WatchEntry, WatchRegistry};
pub use result::{CheckResult, CheckState, LengthField, StatusField};
pub use state::StateStore;
pub use validate::{is_valid_headers, is_valid_url, validate_input, ErrorCode};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "urlmon/0.1";

/// Maximum length of body and error excerpts, in characters
pub const EXCERPT_LIMIT: usize = 200;

/// Length of the short content fingerprint, in hex characters
pub const FINGERPRINT_LEN: usize = 8;

/// Default check interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Default per-fetch timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Sentinel state reported when a fetch fails for any reason
pub const UNAVAILABLE: &str = "unavailable";
