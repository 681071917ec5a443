//! RFC 9457 Problem Details document and its encoder.

use std::fmt;

use http::StatusCode;
use serde::Serialize;

use crate::error::ProblemError;
use crate::extension::Extension;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// RFC 9457 Problem Details for HTTP APIs.
///
/// Serializes with a stable key order: `type`, `title`, `status`, `detail`,
/// `instance`, `extensions`. The last three are omitted when empty.
/// Decoding needs an extension registry, see [`crate::ProblemDecoder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[must_use]
pub struct Problem {
    /// Absolute URI that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    /// Passed through as-is; range checks are left to the caller.
    pub status: i64,
    /// A human-readable explanation specific to this occurrence of the problem.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    /// A URI reference that identifies the specific occurrence of the problem.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instance: String,
    /// Additional members, in insertion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Problem {
    pub fn new(type_url: impl Into<String>, title: impl Into<String>, status: i64) -> Self {
        Self {
            type_url: type_url.into(),
            title: title.into(),
            status,
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_extension(mut self, ext: impl Into<Extension>) -> Self {
        self.extensions.push(ext.into());
        self
    }

    pub fn add_extension(&mut self, ext: impl Into<Extension>) {
        self.extensions.push(ext.into());
    }

    /// The status code exactly as carried in the document.
    #[must_use]
    pub fn http_status(&self) -> i64 {
        self.status
    }

    /// The status as an `http::StatusCode`, if it is a valid HTTP code.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        u16::try_from(self.status)
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
    }

    #[must_use]
    pub fn media_type(&self) -> &'static str {
        APPLICATION_PROBLEM_JSON
    }

    /// Encodes the document as compact JSON bytes.
    ///
    /// # Errors
    /// Returns `ProblemError::Encode` when an extension has no JSON representation.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, ProblemError> {
        serde_json::to_vec(self).map_err(ProblemError::Encode)
    }

    /// Encodes the document as a compact JSON string.
    ///
    /// # Errors
    /// Returns `ProblemError::Encode` when an extension has no JSON representation.
    pub fn to_json_string(&self) -> Result<String, ProblemError> {
        serde_json::to_string(self).map_err(ProblemError::Encode)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "title={}", self.title)?;
        writeln!(f, "error_type={}", self.type_url)?;
        writeln!(f, "error_detail={}", self.detail)?;
        writeln!(f, "http_status={}", self.status)?;
        write!(f, "instance={}", self.instance)
    }
}

impl std::error::Error for Problem {}
