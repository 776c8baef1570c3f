//! Content fingerprints for change detection
//!
//! A fingerprint is a hex digest of response bytes, optionally truncated.
//! The sensor path uses a short MD5 prefix as a cheap change-detector; the
//! batch path keeps the full SHA-256 digest.

use md5::Md5;
use sha2::{Digest, Sha256};

use crate::FINGERPRINT_LEN;

/// Digest algorithm used for a fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// MD5 (sensor fingerprints; not used for anything security-relevant)
    Md5,
    /// SHA-256 (batch fingerprints)
    Sha256,
}

/// Computes content fingerprints with a fixed algorithm and truncation
///
/// A `Fingerprinter` is a pure function of the input bytes: identical input
/// always yields an identical fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprinter {
    algorithm: HashAlgorithm,
    truncate: Option<usize>,
}

impl Fingerprinter {
    /// Create a fingerprinter with an explicit algorithm and truncation
    pub fn new(algorithm: HashAlgorithm, truncate: Option<usize>) -> Self {
        Self {
            algorithm,
            truncate,
        }
    }

    /// Short form: first 8 hex characters of the MD5 digest
    pub fn short() -> Self {
        Self::new(HashAlgorithm::Md5, Some(FINGERPRINT_LEN))
    }

    /// Full form: untruncated SHA-256 digest
    pub fn full() -> Self {
        Self::new(HashAlgorithm::Sha256, None)
    }

    /// Compute the lowercase hex fingerprint of `data`
    pub fn digest(&self, data: &[u8]) -> String {
        let mut hex = match self.algorithm {
            HashAlgorithm::Md5 => hex::encode(Md5::digest(data)),
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        };
        if let Some(len) = self.truncate {
            hex.truncate(len);
        }
        hex
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::short()
    }
}
