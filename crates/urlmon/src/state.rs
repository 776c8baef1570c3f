//! Previous-state store for the batch variant
//!
//! A flat JSON object file mapping URL to the fingerprint observed on the
//! last run. Read once at the start of a batch and overwritten with the full
//! current set at the end.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StateError;

/// Default state file name, as used by the original batch runs
pub const DEFAULT_STATE_FILE: &str = "previous_states.json";

/// File-backed URL → fingerprint map
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store over the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous fingerprints
    ///
    /// A missing file is the normal first-run case and loads as an empty
    /// map. A file that exists but cannot be read or parsed is an error:
    /// treating it as empty would silently drop the whole baseline.
    pub fn load(&self) -> Result<BTreeMap<String, String>, StateError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => {
                return Err(StateError::Io {
                    path: self.path.display().to_string(),
                    source: err,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|err| StateError::Parse {
            path: self.path.display().to_string(),
            source: err,
        })
    }

    /// Overwrite the file with the given fingerprints
    pub fn save(&self, states: &BTreeMap<String, String>) -> Result<(), StateError> {
        let json = serde_json::to_string(states).map_err(|err| StateError::Parse {
            path: self.path.display().to_string(),
            source: err,
        })?;
        fs::write(&self.path, json).map_err(|err| StateError::Io {
            path: self.path.display().to_string(),
            source: err,
        })
    }
}
