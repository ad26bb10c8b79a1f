//! Type-erased field values
//!
//! A [`FieldValue`] is what a dynamic field holds: a scalar, a string, an
//! enumerated value by variant name, a reference to another object or
//! collection, or an opaque host payload the protocol never interprets.
//! Scalars compare by value; reference-semantic variants compare by handle
//! identity, matching the reference semantics of the source graph.

use crate::collection::CollectionHandle;
use crate::object::ObjectHandle;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An enumerated value: declaring enum type plus the selected variant name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Name of the declaring enum type
    pub type_name: String,
    /// Selected variant name
    pub variant: String,
}

impl EnumValue {
    /// Create an enum value
    #[inline]
    #[must_use]
    pub fn new(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, self.variant)
    }
}

/// A type-erased value held by one field of a dynamic object
#[derive(Clone)]
pub enum FieldValue {
    /// Absent reference
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating-point scalar
    Float(f64),
    /// String value
    Str(String),
    /// Enumerated value, carried by variant name
    Enum(EnumValue),
    /// Reference to another dynamic object
    Object(ObjectHandle),
    /// Reference to a slot collection
    Collection(CollectionHandle),
    /// Host payload the protocol does not interpret
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl FieldValue {
    /// True for the absent reference
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the string content, if this is a string value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Borrow the enumerated value, if any
    #[inline]
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Borrow the object handle, if any
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Borrow the collection handle, if any
    #[inline]
    #[must_use]
    pub fn as_collection(&self) -> Option<&CollectionHandle> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Short kind name for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Enum(_) => "enum",
            Self::Object(_) => "object",
            Self::Collection(_) => "collection",
            Self::Opaque(_) => "opaque",
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => ObjectHandle::ptr_eq(a, b),
            (Self::Collection(a), Self::Collection(b)) => CollectionHandle::ptr_eq(a, b),
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::Int(v) => write!(f, "Int({v})"),
            Self::Float(v) => write!(f, "Float({v})"),
            Self::Str(v) => write!(f, "Str({v:?})"),
            Self::Enum(v) => write!(f, "Enum({v})"),
            Self::Object(v) => write!(f, "Object({v:?})"),
            Self::Collection(v) => write!(f, "Collection({v:?})"),
            Self::Opaque(_) => write!(f, "Opaque(..)"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<EnumValue> for FieldValue {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}
