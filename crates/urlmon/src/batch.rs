//! One-shot batch change detection
//!
//! The batch form operates over newline-separated `url;key:value;key:value`
//! entries (semicolon-delimited, a deliberately distinct format from the
//! `|`-delimited target configuration). Each URL is fetched once, its raw
//! body bytes fingerprinted with full SHA-256 whatever the HTTP status, and
//! compared against the previous run's fingerprint from the state file. The
//! file is then overwritten with the full current set.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{error, info};

use crate::checker::HttpChecker;
use crate::config::parse_headers;
use crate::error::{ConfigError, StateError};
use crate::fingerprint::Fingerprinter;
use crate::state::StateStore;
use crate::DEFAULT_TIMEOUT_SECS;

/// One parsed batch entry line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// The URL to fetch
    pub url: String,
    /// Request headers from the semicolon-delimited entry tail
    pub headers: Vec<(String, String)>,
}

/// Parse a single `url;key:value;key:value` line
///
/// Header entries follow the same first-colon/trim rule as the `|` form.
pub fn parse_batch_line(line: &str) -> Result<BatchEntry, ConfigError> {
    let mut parts = line.trim().split(';');
    let url = parts.next().unwrap_or("").trim();
    if url.is_empty() {
        return Err(ConfigError::EmptyBatchEntry);
    }

    let mut headers = Vec::new();
    for part in parts {
        headers.extend(parse_headers(part)?);
    }

    Ok(BatchEntry {
        url: url.to_string(),
        headers,
    })
}

/// Parse newline-separated batch input, skipping blank lines
pub fn parse_batch_lines(input: &str) -> Result<Vec<BatchEntry>, ConfigError> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_batch_line)
        .collect()
}

/// Outcome of one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// URLs whose fingerprint differs from the previous run
    pub changed: Vec<String>,
    /// URLs whose fetch produced no response this run
    pub failed: Vec<String>,
    /// The fingerprint set written back to the state file
    pub current: BTreeMap<String, String>,
}

impl BatchReport {
    /// The changed URLs joined with `"; "`, the original report format
    pub fn report_line(&self) -> String {
        self.changed.join("; ")
    }
}

/// Run one batch pass and overwrite the state file
///
/// A URL seen for the first time is recorded but never reported as changed.
/// A fetch that produced no response keeps the previous fingerprint (when
/// one exists) so a flaky run neither erases the baseline nor fabricates a
/// change on the next pass.
pub async fn run_batch(
    checker: &HttpChecker,
    store: &StateStore,
    entries: &[BatchEntry],
) -> Result<BatchReport, StateError> {
    let previous = store.load()?;
    let fingerprinter = Fingerprinter::full();
    let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

    let mut report = BatchReport::default();

    for entry in entries {
        match checker.fetch_raw(&entry.url, &entry.headers, timeout).await {
            Ok(raw) => {
                let fingerprint = fingerprinter.digest(&raw.body);
                if let Some(old) = previous.get(&entry.url) {
                    if *old != fingerprint {
                        report.changed.push(entry.url.clone());
                    }
                }
                report.current.insert(entry.url.clone(), fingerprint);
            }
            Err(err) => {
                error!(url = %entry.url, error = %err, "Batch fetch failed");
                report.failed.push(entry.url.clone());
                if let Some(old) = previous.get(&entry.url) {
                    report.current.insert(entry.url.clone(), old.clone());
                }
            }
        }
    }

    store.save(&report.current)?;
    info!(
        checked = entries.len(),
        changed = report.changed.len(),
        failed = report.failed.len(),
        "Batch run complete"
    );

    Ok(report)
}
