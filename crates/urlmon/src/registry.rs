//! Target registry
//!
//! An explicit, concurrent registry of configured targets and their latest
//! results, keyed by URL. Whatever drives the checks owns a registry for its
//! lifetime; the checker itself never touches it.

use dashmap::DashMap;

use crate::config::CheckTarget;
use crate::error::ConfigError;
use crate::result::CheckResult;

/// One registered target plus the most recent result, if any
#[derive(Debug, Clone)]
pub struct WatchEntry {
    /// The configured target
    pub target: CheckTarget,
    /// Result of the most recent check
    pub last_result: Option<CheckResult>,
}

/// Concurrent registry of watch targets keyed by URL
#[derive(Debug, Default)]
pub struct WatchRegistry {
    entries: DashMap<String, WatchEntry>,
}

impl WatchRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target
    ///
    /// A URL can only be configured once; a second insert for the same URL
    /// is rejected. Use [`update`](Self::update) to change settings.
    pub fn insert(&self, target: CheckTarget) -> Result<(), ConfigError> {
        if self.entries.contains_key(&target.url) {
            return Err(ConfigError::DuplicateTarget(target.url));
        }
        self.entries.insert(
            target.url.clone(),
            WatchEntry {
                target,
                last_result: None,
            },
        );
        Ok(())
    }

    /// Replace an existing target's settings, keeping its last result
    ///
    /// Returns false when the URL is not registered.
    pub fn update(&self, target: CheckTarget) -> bool {
        match self.entries.get_mut(&target.url) {
            Some(mut entry) => {
                entry.target = target;
                true
            }
            None => false,
        }
    }

    /// Remove a target, returning its entry
    pub fn remove(&self, url: &str) -> Option<WatchEntry> {
        self.entries.remove(url).map(|(_, entry)| entry)
    }

    /// Store the latest result for a URL
    ///
    /// Returns the fingerprint recorded by the previous result, if any, so
    /// the caller can detect a content change.
    pub fn record(&self, url: &str, result: CheckResult) -> Option<String> {
        let mut entry = self.entries.get_mut(url)?;
        let previous = entry
            .last_result
            .as_ref()
            .and_then(|r| r.state.fingerprint())
            .map(|fp| fp.to_string());
        entry.last_result = Some(result);
        previous
    }

    /// The latest result for a URL
    pub fn latest(&self, url: &str) -> Option<CheckResult> {
        self.entries.get(url)?.last_result.clone()
    }

    /// The registered target for a URL
    pub fn target(&self, url: &str) -> Option<CheckTarget> {
        self.entries.get(url).map(|entry| entry.target.clone())
    }

    /// Snapshot of all registered targets
    pub fn targets(&self) -> Vec<CheckTarget> {
        self.entries
            .iter()
            .map(|entry| entry.target.clone())
            .collect()
    }

    /// Number of registered targets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no targets are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
