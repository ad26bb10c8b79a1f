//! Slot collection protocol
//!
//! A collection is anything that can enumerate its elements and accept one
//! appended element. Elements are dynamic objects; the logical key of an
//! element is read through the well-known [`KEY_FIELD`] field.

use crate::error::ReflectError;
use crate::object::ObjectHandle;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Well-known field carrying an element's logical key
pub const KEY_FIELD: &str = "Key";

/// Collection protocol: enumerate plus a single append entry point
pub trait SlotCollection: Send {
    /// Snapshot of the current elements, in collection order
    fn elements(&self) -> Vec<ObjectHandle>;

    /// Append one element
    ///
    /// # Errors
    /// [`ReflectError::WriteFailed`] when the host rejects the element
    fn append(&mut self, element: ObjectHandle) -> Result<(), ReflectError>;
}

/// Shared handle to a live slot collection
#[derive(Clone)]
pub struct CollectionHandle {
    inner: Arc<Mutex<dyn SlotCollection>>,
}

impl CollectionHandle {
    /// Wrap a collection into a shared handle
    #[must_use]
    pub fn new(collection: impl SlotCollection + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(collection)),
        }
    }

    /// Snapshot of the current elements
    #[must_use]
    pub fn elements(&self) -> Vec<ObjectHandle> {
        self.inner.lock().elements()
    }

    /// Number of elements currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().elements().len()
    }

    /// True when the collection holds no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one element
    ///
    /// # Errors
    /// See [`SlotCollection::append`]
    pub fn append(&self, element: ObjectHandle) -> Result<(), ReflectError> {
        self.inner.lock().append(element)
    }

    /// True when both handles refer to the same collection
    #[inline]
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for CollectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(collection) => write!(f, "CollectionHandle(len={})", collection.elements().len()),
            None => write!(f, "CollectionHandle(<locked>)"),
        }
    }
}

/// Read an element's logical key, when it has a readable string key
#[must_use]
pub fn element_key(element: &ObjectHandle) -> Option<String> {
    element
        .get(KEY_FIELD)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
}

/// Vec-backed in-memory collection
#[derive(Debug, Default)]
pub struct VecCollection {
    items: Vec<ObjectHandle>,
}

impl VecCollection {
    /// Create an empty collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection already wrapped in a handle
    #[inline]
    #[must_use]
    pub fn handle() -> CollectionHandle {
        CollectionHandle::new(Self::new())
    }
}

impl SlotCollection for VecCollection {
    fn elements(&self) -> Vec<ObjectHandle> {
        self.items.clone()
    }

    fn append(&mut self, element: ObjectHandle) -> Result<(), ReflectError> {
        self.items.push(element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassSpec, DeclaredType, FieldSpec};
    use crate::object::FieldObject;
    use crate::value::FieldValue;

    fn keyed_element(key: &str) -> ObjectHandle {
        let class = ClassSpec::new("Slot")
            .field(FieldSpec::new(KEY_FIELD, DeclaredType::Str))
            .seal();
        let handle = ObjectHandle::new(FieldObject::with_defaults(class));
        handle.set(KEY_FIELD, FieldValue::from(key)).unwrap();
        handle
    }

    #[test]
    fn append_then_enumerate() {
        let collection = VecCollection::handle();
        assert!(collection.is_empty());

        collection.append(keyed_element("Stock")).unwrap();
        collection.append(keyed_element("Tec")).unwrap();

        let keys: Vec<_> = collection
            .elements()
            .iter()
            .filter_map(element_key)
            .collect();
        assert_eq!(keys, vec!["Stock".to_string(), "Tec".to_string()]);
    }

    #[test]
    fn element_key_absent_when_unreadable() {
        let class = ClassSpec::new("Keyless").seal();
        let element = ObjectHandle::new(FieldObject::with_defaults(class));
        assert_eq!(element_key(&element), None);
    }

    #[test]
    fn element_key_absent_when_null() {
        let class = ClassSpec::new("Slot")
            .field(FieldSpec::new(KEY_FIELD, DeclaredType::Str))
            .seal();
        let element = ObjectHandle::new(FieldObject::with_defaults(class));
        // Key declared but never assigned; defaults to a null reference.
        assert_eq!(element_key(&element), None);
    }

    #[test]
    fn handle_identity() {
        let a = VecCollection::handle();
        let b = a.clone();
        let c = VecCollection::handle();
        assert!(CollectionHandle::ptr_eq(&a, &b));
        assert!(!CollectionHandle::ptr_eq(&a, &c));
    }
}
