//! Dynamic object protocol
//!
//! [`DynObject`] is the per-instance capability: get and set fields by name,
//! both fallible. [`ObjectHandle`] is the shared handle the rest of the
//! engine passes around. [`FieldObject`] is the reusable in-memory
//! implementation backing instances constructed through
//! [`ClassSpec`](crate::class::ClassSpec); every one carries a fresh
//! intrinsic identity, separate from any identity-named fields its class
//! declares.

use crate::class::ClassHandle;
use crate::error::ReflectError;
use crate::value::FieldValue;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use ulid::Ulid;

/// Per-instance field access protocol
pub trait DynObject: Send {
    /// Runtime type of this object
    fn class(&self) -> ClassHandle;

    /// Read one field by name
    ///
    /// # Errors
    /// - [`ReflectError::UnknownField`] when the field is not present
    /// - [`ReflectError::ReadFailed`] when the host cannot produce the value
    fn get(&self, field: &str) -> Result<FieldValue, ReflectError>;

    /// Write one field by name
    ///
    /// # Errors
    /// - [`ReflectError::UnknownField`] when the field is not present
    /// - [`ReflectError::WriteFailed`] when the host rejects the value
    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), ReflectError>;
}

/// Shared handle to a live dynamic object
#[derive(Clone)]
pub struct ObjectHandle {
    inner: Arc<Mutex<dyn DynObject>>,
}

impl ObjectHandle {
    /// Wrap an object into a shared handle
    #[must_use]
    pub fn new(object: impl DynObject + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(object)),
        }
    }

    /// Runtime type of the held object
    #[must_use]
    pub fn class(&self) -> ClassHandle {
        self.inner.lock().class()
    }

    /// Read one field
    ///
    /// # Errors
    /// See [`DynObject::get`]
    pub fn get(&self, field: &str) -> Result<FieldValue, ReflectError> {
        self.inner.lock().get(field)
    }

    /// Write one field
    ///
    /// # Errors
    /// See [`DynObject::set`]
    pub fn set(&self, field: &str, value: FieldValue) -> Result<(), ReflectError> {
        self.inner.lock().set(field, value)
    }

    /// True when both handles refer to the same object
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(object) => write!(f, "ObjectHandle({})", object.class().name()),
            None => write!(f, "ObjectHandle(<locked>)"),
        }
    }
}

/// In-memory dynamic object backed by an ordered field map
///
/// Holds every field its class declares (own and inherited); reads and
/// writes of undeclared fields fail. Each instance carries a fresh intrinsic
/// [`Ulid`] identity.
pub struct FieldObject {
    class: ClassHandle,
    id: Ulid,
    values: IndexMap<String, FieldValue>,
}

impl FieldObject {
    /// Create an instance with every declared field at its type's default
    #[must_use]
    pub fn with_defaults(class: ClassHandle) -> Self {
        let values = class
            .fields()
            .into_iter()
            .map(|f| {
                let default = f.ty.default_value();
                (f.name, default)
            })
            .collect();
        Self {
            class,
            id: Ulid::new(),
            values,
        }
    }

    /// Intrinsic identity of this instance
    #[inline]
    #[must_use]
    pub fn id(&self) -> Ulid {
        self.id
    }

    /// True when the field is declared on this instance
    #[inline]
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }
}

impl fmt::Debug for FieldObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldObject")
            .field("class", &self.class.name())
            .field("id", &self.id)
            .field("fields", &self.values.len())
            .finish()
    }
}

impl DynObject for FieldObject {
    fn class(&self) -> ClassHandle {
        self.class.clone()
    }

    fn get(&self, field: &str) -> Result<FieldValue, ReflectError> {
        self.values
            .get(field)
            .cloned()
            .ok_or_else(|| ReflectError::UnknownField(field.to_string()))
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), ReflectError> {
        match self.values.get_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ReflectError::UnknownField(field.to_string())),
        }
    }
}
