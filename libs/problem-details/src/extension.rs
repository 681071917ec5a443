//! Extension values carried by a problem document.
//!
//! Extensions have no envelope on the wire: a typed extension serializes as its
//! own natural JSON shape, and an untyped one as the object it was parsed from.

use std::any::Any;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Object-safe view of a typed extension shape.
///
/// Implemented for every `Serialize + Clone + Debug + Send + Sync + 'static`
/// type, so any serde model can be attached to a [`crate::Problem`].
pub trait ExtensionValue: fmt::Debug + Send + Sync + 'static {
    /// Renders the value as JSON.
    ///
    /// # Errors
    /// Returns the serializer error when the value has no JSON representation
    /// (for example a map with non-string keys).
    fn to_json(&self) -> Result<Value, serde_json::Error>;

    fn clone_boxed(&self) -> Box<dyn ExtensionValue>;

    fn as_any(&self) -> &dyn Any;
}

impl<T> ExtensionValue for T
where
    T: Serialize + Clone + fmt::Debug + Send + Sync + 'static,
{
    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn clone_boxed(&self) -> Box<dyn ExtensionValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One element of a problem document's `extensions` list.
#[derive(Debug)]
pub enum Extension {
    /// A value resolved to (or built from) a known shape.
    Typed {
        /// Shape name; for serde shapes this is `std::any::type_name::<T>()`.
        shape: &'static str,
        value: Box<dyn ExtensionValue>,
    },
    /// Fallback representation for objects no registered shape accepted.
    Untyped(Map<String, Value>),
}

impl Extension {
    /// Wraps a typed value, naming its shape after the Rust type.
    #[must_use]
    pub fn typed<T: ExtensionValue>(value: T) -> Self {
        Self::Typed {
            shape: std::any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    /// Wraps a generic key-value object.
    #[must_use]
    pub fn untyped(map: Map<String, Value>) -> Self {
        Self::Untyped(map)
    }

    /// Shape name of a typed extension, `None` for the fallback representation.
    #[must_use]
    pub fn shape(&self) -> Option<&'static str> {
        match self {
            Self::Typed { shape, .. } => Some(*shape),
            Self::Untyped(_) => None,
        }
    }

    #[must_use]
    pub fn is_typed(&self) -> bool {
        matches!(self, Self::Typed { .. })
    }

    /// Borrows the typed value as `T`, if this extension holds one.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Typed { value, .. } => value.as_any().downcast_ref::<T>(),
            Self::Untyped(_) => None,
        }
    }

    #[must_use]
    pub fn as_untyped(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Typed { .. } => None,
            Self::Untyped(map) => Some(map),
        }
    }

    /// Renders the extension as the JSON it serializes to.
    ///
    /// # Errors
    /// Propagates the serializer error of a typed value.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Typed { value, .. } => value.to_json(),
            Self::Untyped(map) => Ok(Value::Object(map.clone())),
        }
    }
}

impl Clone for Extension {
    fn clone(&self) -> Self {
        match self {
            Self::Typed { shape, value } => Self::Typed {
                shape: *shape,
                value: value.clone_boxed(),
            },
            Self::Untyped(map) => Self::Untyped(map.clone()),
        }
    }
}

impl PartialEq for Extension {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Untyped(a), Self::Untyped(b)) => a == b,
            (Self::Typed { shape: sa, value: va }, Self::Typed { shape: sb, value: vb }) => {
                sa == sb
                    && matches!((va.to_json(), vb.to_json()), (Ok(a), Ok(b)) if a == b)
            }
            _ => false,
        }
    }
}

impl Serialize for Extension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Typed { value, .. } => value
                .to_json()
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer),
            Self::Untyped(map) => map.serialize(serializer),
        }
    }
}

impl From<Map<String, Value>> for Extension {
    fn from(map: Map<String, Value>) -> Self {
        Self::Untyped(map)
    }
}
