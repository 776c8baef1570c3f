//! Check results
//!
//! A [`CheckResult`] is produced fresh on every check and fully replaces the
//! previous one. The state field carries the short content fingerprint on
//! success and the literal `unavailable` on any failure; the auxiliary
//! fields keep truncated diagnostics plus the timeout/interval used, for
//! display. Status and content-length use explicit markers so a consumer
//! can tell "no response received" apart from "response with an error
//! status".

use serde::{Serialize, Serializer};

use crate::UNAVAILABLE;

/// Primary observable value of a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckState {
    /// Short hex fingerprint of the response body
    Fingerprint(String),
    /// Fetch failed; see the error excerpt
    Unavailable,
}

impl CheckState {
    /// The exposed state string: the fingerprint or `"unavailable"`
    pub fn as_str(&self) -> &str {
        match self {
            CheckState::Fingerprint(fp) => fp,
            CheckState::Unavailable => UNAVAILABLE,
        }
    }

    /// True when this state carries a fingerprint
    pub fn is_available(&self) -> bool {
        matches!(self, CheckState::Fingerprint(_))
    }

    /// The fingerprint, if available
    pub fn fingerprint(&self) -> Option<&str> {
        match self {
            CheckState::Fingerprint(fp) => Some(fp),
            CheckState::Unavailable => None,
        }
    }
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CheckState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// HTTP status as observed by a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    /// A response was received with this status code (2xx or not)
    Code(u16),
    /// No response was received at all
    Error,
}

impl std::fmt::Display for StatusField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusField::Code(code) => write!(f, "{code}"),
            StatusField::Error => f.write_str("error"),
        }
    }
}

impl Serialize for StatusField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatusField::Code(code) => serializer.serialize_u16(*code),
            StatusField::Error => serializer.serialize_str("error"),
        }
    }
}

/// Content-length as observed by a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthField {
    /// The `content-length` response header value
    Value(String),
    /// Header absent on a success response
    Unknown,
    /// Header absent on a failure, or no response was received
    Error,
}

impl LengthField {
    /// Wrap an optional header value, with `fallback` when absent
    pub fn from_header(value: Option<&str>, fallback: LengthField) -> Self {
        match value {
            Some(v) => LengthField::Value(v.to_string()),
            None => fallback,
        }
    }

    /// The exposed string form
    pub fn as_str(&self) -> &str {
        match self {
            LengthField::Value(v) => v,
            LengthField::Unknown => "unknown",
            LengthField::Error => "error",
        }
    }
}

impl std::fmt::Display for LengthField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LengthField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of one fetch-and-hash check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    /// Fingerprint on success, `unavailable` on failure
    pub state: CheckState,
    /// Error excerpt (first 200 chars); empty on success
    pub error: String,
    /// Body excerpt (first 200 chars); empty on failure
    pub extract: String,
    /// HTTP status code, or the `error` marker when no response exists
    pub status_code: StatusField,
    /// `content-length` header, `unknown`, or the `error` marker
    pub content_length: LengthField,
    /// Timeout used for this check, in seconds
    pub timeout: u64,
    /// Interval used for this check, in seconds
    pub interval: u64,
}

impl CheckResult {
    /// True when the check produced a fingerprint
    pub fn is_available(&self) -> bool {
        self.state.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> CheckResult {
        CheckResult {
            state: CheckState::Fingerprint("5d41402a".into()),
            error: String::new(),
            extract: "hello".into(),
            status_code: StatusField::Code(200),
            content_length: LengthField::Value("5".into()),
            timeout: 10,
            interval: 3600,
        }
    }

    #[test]
    fn test_state_strings() {
        assert_eq!(CheckState::Fingerprint("abcd1234".into()).as_str(), "abcd1234");
        assert_eq!(CheckState::Unavailable.as_str(), "unavailable");
        assert!(CheckState::Unavailable.fingerprint().is_none());
    }

    #[test]
    fn test_success_serialization() {
        let json = serde_json::to_value(success()).unwrap();
        assert_eq!(json["state"], "5d41402a");
        assert_eq!(json["status_code"], 200);
        assert_eq!(json["content_length"], "5");
        assert_eq!(json["error"], "");
    }

    #[test]
    fn test_failure_serialization_markers() {
        let result = CheckResult {
            state: CheckState::Unavailable,
            error: "Request timed out".into(),
            extract: String::new(),
            status_code: StatusField::Error,
            content_length: LengthField::Error,
            timeout: 10,
            interval: 3600,
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["state"], "unavailable");
        assert_eq!(json["status_code"], "error");
        assert_eq!(json["content_length"], "error");
    }

    #[test]
    fn test_length_field_from_header() {
        assert_eq!(
            LengthField::from_header(Some("123"), LengthField::Unknown),
            LengthField::Value("123".into())
        );
        assert_eq!(
            LengthField::from_header(None, LengthField::Unknown),
            LengthField::Unknown
        );
        assert_eq!(
            LengthField::from_header(None, LengthField::Error).as_str(),
            "error"
        );
    }
}
