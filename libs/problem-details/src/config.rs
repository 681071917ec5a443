//! Resource limits applied before a body is parsed.

use serde::Deserialize;

/// Ceilings for a single decode call.
///
/// Every extension element is trial-parsed against every registered shape, so
/// decode cost grows with `shapes * body size`. Both checks run before any
/// trial parsing starts. Nesting depth is bounded by `serde_json`'s own
/// recursion limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DecodeLimits {
    /// Maximum body size in bytes.
    /// Default: 64 KiB
    pub max_body_bytes: usize,

    /// Maximum number of elements in the `extensions` array.
    /// Default: 64
    pub max_extensions: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            max_extensions: 64,
        }
    }
}

impl DecodeLimits {
    /// Limits that never reject a body.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_body_bytes: usize::MAX,
            max_extensions: usize::MAX,
        }
    }
}
