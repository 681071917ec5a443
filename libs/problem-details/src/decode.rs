//! Problem document decoding with registry-resolved extensions.
//!
//! Fixed fields are parsed directly. Each element of `extensions` is resolved
//! independently:
//! 1. every registered shape is tried in registration order, the first one
//!    that parses wins;
//! 2. otherwise the element is kept as a generic object and the sink is told;
//! 3. an element that is not even an object is dropped and reported to the
//!    sink as an [`ExtensionError`]. Siblings are unaffected.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::config::DecodeLimits;
use crate::diagnostics::DiagnosticSink;
use crate::error::{ExtensionError, ProblemError};
use crate::extension::Extension;
use crate::problem::Problem;
use crate::registry::ExtensionRegistry;

/// Reads JSON `null` as the field's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Wire form of a document before extension resolution.
///
/// Missing or `null` fixed fields take their zero value; a present field of
/// the wrong JSON type is a structural error.
#[derive(Deserialize, Default)]
#[serde(default)]
struct WireProblem {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    type_url: String,
    #[serde(deserialize_with = "null_as_default")]
    title: String,
    #[serde(deserialize_with = "null_as_default")]
    status: i64,
    #[serde(deserialize_with = "null_as_default")]
    detail: String,
    #[serde(deserialize_with = "null_as_default")]
    instance: String,
    #[serde(deserialize_with = "null_as_default")]
    extensions: Vec<Value>,
}

/// Decodes problem documents against a fixed extension registry.
///
/// Cheap to clone; clones share the registry and the sink. Decoding takes
/// `&self` and no locks, so one decoder can serve many threads.
#[derive(Clone)]
pub struct ProblemDecoder {
    registry: Arc<ExtensionRegistry>,
    sink: Arc<dyn DiagnosticSink>,
    limits: DecodeLimits,
}

impl ProblemDecoder {
    /// Creates a decoder with default [`DecodeLimits`].
    #[must_use]
    pub fn new(registry: Arc<ExtensionRegistry>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            registry,
            sink,
            limits: DecodeLimits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Decodes a problem document from JSON bytes.
    ///
    /// # Errors
    /// - `ProblemError::BodyTooLarge` / `TooManyExtensions` when a limit is exceeded
    /// - `ProblemError::Structural` for invalid JSON or a mistyped fixed field
    ///
    /// Extension elements that cannot be represented at all are dropped and
    /// reported to the sink; they never fail the call.
    pub fn decode(&self, body: &[u8]) -> Result<Problem, ProblemError> {
        if body.len() > self.limits.max_body_bytes {
            return Err(ProblemError::BodyTooLarge {
                limit: self.limits.max_body_bytes,
                actual: body.len(),
            });
        }

        let wire: WireProblem = serde_json::from_slice(body).map_err(ProblemError::Structural)?;
        let raw_extensions = wire.extensions;

        if raw_extensions.len() > self.limits.max_extensions {
            return Err(ProblemError::TooManyExtensions {
                limit: self.limits.max_extensions,
                actual: raw_extensions.len(),
            });
        }

        let mut extensions = Vec::with_capacity(raw_extensions.len());
        for (index, raw) in raw_extensions.iter().enumerate() {
            match self.resolve_extension(index, raw) {
                Ok(ext) => extensions.push(ext),
                Err(err) => self.sink.extension_rejected(&err),
            }
        }

        Ok(Problem {
            type_url: wire.type_url,
            title: wire.title,
            status: wire.status,
            detail: wire.detail,
            instance: wire.instance,
            extensions,
        })
    }

    /// Decodes a problem document from a JSON string.
    ///
    /// # Errors
    /// Same as [`ProblemDecoder::decode`].
    pub fn decode_str(&self, body: &str) -> Result<Problem, ProblemError> {
        self.decode(body.as_bytes())
    }

    /// Resolves one extension element to a registered shape or the fallback.
    ///
    /// # Errors
    /// Returns `ExtensionError` when no shape matched and the element is not a
    /// JSON object.
    pub fn resolve_extension(
        &self,
        index: usize,
        raw: &Value,
    ) -> Result<Extension, ExtensionError> {
        for entry in self.registry.entries() {
            if let Ok(value) = (entry.trial)(raw) {
                return Ok(Extension::Typed {
                    shape: entry.name,
                    value,
                });
            }
        }

        let fallback = Map::<String, Value>::deserialize(raw)
            .map_err(|source| ExtensionError { index, source })?;
        self.sink.unmatched_extension(index, &fallback);
        Ok(Extension::Untyped(fallback))
    }
}

impl std::fmt::Debug for ProblemDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemDecoder")
            .field("registry", &self.registry)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
