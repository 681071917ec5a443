//! Diagnostic sink for non-fatal decode events.

use serde_json::{Map, Value};

use crate::error::ExtensionError;

/// Receives notices about extension elements that did not resolve to a
/// registered shape.
///
/// A sink is a required argument of [`crate::ProblemDecoder::new`]; there is
/// no implicit global logger to forget.
pub trait DiagnosticSink: Send + Sync {
    /// An element matched no registered shape and was kept as a generic object.
    fn unmatched_extension(&self, index: usize, data: &Map<String, Value>);

    /// An element matched no shape and was not an object; it was dropped.
    fn extension_rejected(&self, error: &ExtensionError);
}

/// Sink that forwards notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn unmatched_extension(&self, index: usize, data: &Map<String, Value>) {
        tracing::warn!(
            index,
            data = %serde_json::Value::Object(data.clone()),
            "Extension did not match any registered shape, keeping it as a generic object"
        );
    }

    fn extension_rejected(&self, error: &ExtensionError) {
        tracing::error!(index = error.index, error = %error.source, "Failed to decode extension");
    }
}
