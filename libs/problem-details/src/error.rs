//! Error types for encoding and decoding problem documents.

use thiserror::Error;

/// Failure of a whole encode or decode call.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProblemError {
    /// The body is not valid JSON, or a fixed field has the wrong JSON type.
    #[error("malformed problem document: {0}")]
    Structural(#[source] serde_json::Error),

    /// A field or extension could not be rendered as JSON.
    #[error("failed to encode problem document: {0}")]
    Encode(#[source] serde_json::Error),

    /// Body exceeded the configured size ceiling; nothing was parsed.
    #[error("problem document too large: limit {limit} bytes, got {actual} bytes")]
    BodyTooLarge { limit: usize, actual: usize },

    /// The extensions array held more elements than the configured ceiling.
    #[error("too many extensions: limit {limit}, got {actual}")]
    TooManyExtensions { limit: usize, actual: usize },
}

/// A single extension element that matched no registered shape and could not
/// be represented as a generic object either.
///
/// Scoped to one element: sibling extensions still resolve and the document
/// decode succeeds without it.
#[derive(Error, Debug)]
#[error("failed to decode extension at index {index}: {source}")]
pub struct ExtensionError {
    /// Position of the element in the wire `extensions` array.
    pub index: usize,
    #[source]
    pub source: serde_json::Error,
}
