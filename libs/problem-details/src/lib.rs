//! RFC 9457 Problem Details with open-ended, registry-resolved extensions
//!
//! A problem document has strongly typed fixed members (`type`, `title`,
//! `status`, `detail`, `instance`) and an `extensions` list whose elements
//! carry no type tag on the wire. Decoding resolves each element by trial:
//! - Shapes are registered in an [`ExtensionRegistry`] (`ExtensionRegistry::register`)
//! - [`ProblemDecoder`] tries them in registration order, first match wins
//! - Unmatched objects fall back to a generic map and are reported to a [`DiagnosticSink`]
//!
//! ```
//! use std::sync::Arc;
//! use problem_details::{ExtensionRegistry, ProblemDecoder, TracingSink};
//!
//! #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
//! struct Coded {
//!     code: i64,
//!     message: String,
//! }
//!
//! let mut registry = ExtensionRegistry::new();
//! registry.register::<Coded>();
//! let decoder = ProblemDecoder::new(Arc::new(registry), Arc::new(TracingSink));
//!
//! let problem = decoder
//!     .decode_str(r#"{"type":"https://errors.example.com/x","title":"X","status":400,
//!                    "extensions":[{"code":5,"message":"x"}]}"#)
//!     .unwrap();
//! assert_eq!(problem.extensions[0].downcast_ref::<Coded>().map(|c| c.code), Some(5));
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod config;
pub mod decode;
pub mod diagnostics;
pub mod error;
pub mod extension;
pub mod problem;
pub mod registry;
pub mod transport;

// Re-export commonly used types
pub use catalog::ErrDef;
pub use config::DecodeLimits;
pub use decode::ProblemDecoder;
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::{ExtensionError, ProblemError};
pub use extension::{Extension, ExtensionValue};
pub use problem::{APPLICATION_PROBLEM_JSON, Problem};
pub use registry::{ExtensionRegistry, ShapeHandle, TrialFn};
pub use transport::ProblemWriter;
