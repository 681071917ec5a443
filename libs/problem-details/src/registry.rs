//! Ordered catalog of known extension shapes.
//!
//! Each entry pairs a shape name with a trial parser. The decoder walks the
//! entries in registration order and keeps the first value a trial accepts,
//! so registration order is priority order.
//!
//! Registration takes `&mut self`. Once the registry is wrapped in an `Arc`
//! and handed to a [`crate::ProblemDecoder`] it is read-only, which is what
//! makes concurrent decodes safe without locking.

use serde::de::{self, DeserializeOwned};
use serde_json::Value;

use crate::extension::ExtensionValue;

/// Trial parser for one shape: accept the raw element or reject it.
pub type TrialFn = fn(&Value) -> Result<Box<dyn ExtensionValue>, serde_json::Error>;

/// Identity of a registered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeHandle {
    position: usize,
    name: &'static str,
}

impl ShapeHandle {
    /// Priority of the shape; lower positions are tried first.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[derive(Clone, Copy)]
pub(crate) struct ShapeEntry {
    pub(crate) name: &'static str,
    pub(crate) trial: TrialFn,
}

/// Registry of extension shapes, consulted by the decoder in order.
#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    entries: Vec<ShapeEntry>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serde trial for `T`.
///
/// Derived structs also deserialize from sequences, so the element must have
/// the same JSON kind that `T` serializes to; `[5, "x"]` never matches a
/// struct shape.
fn trial_serde<T>(raw: &Value) -> Result<Box<dyn ExtensionValue>, serde_json::Error>
where
    T: DeserializeOwned + ExtensionValue,
{
    let value = T::deserialize(raw)?;
    let rendered = value.to_json()?;
    if std::mem::discriminant(&rendered) != std::mem::discriminant(raw) {
        return Err(de::Error::custom(format_args!(
            "expected JSON {}, found {}",
            json_kind(&rendered),
            json_kind(raw)
        )));
    }
    Ok(Box::new(value))
}

impl ExtensionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a serde model as an extension shape.
    ///
    /// An element matches when `T` deserializes from it. The shape is named
    /// after the Rust type, so values built with [`crate::Extension::typed`]
    /// and values resolved by the decoder compare equal.
    pub fn register<T>(&mut self) -> ShapeHandle
    where
        T: DeserializeOwned + ExtensionValue,
    {
        self.register_with(std::any::type_name::<T>(), trial_serde::<T>)
    }

    /// Registers a shape backed by a hand-written trial parser.
    ///
    /// Registration is idempotent by name: a name that is already known keeps
    /// its original position and trial, and its existing handle is returned.
    pub fn register_with(&mut self, name: &'static str, trial: TrialFn) -> ShapeHandle {
        if let Some(position) = self.position_of(name) {
            tracing::debug!(shape = name, position, "Extension shape already registered");
            return ShapeHandle { position, name };
        }

        let position = self.entries.len();
        self.entries.push(ShapeEntry { name, trial });
        tracing::debug!(shape = name, position, "Registered extension shape");
        ShapeHandle { position, name }
    }

    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.position_of(std::any::type_name::<T>()).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub(crate) fn entries(&self) -> &[ShapeEntry] {
        &self.entries
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.name))
            .finish()
    }
}
