//! Testing utilities for the graft workspace
//!
//! Shared host doubles (factory, registry, targets) and class fixtures.

#![allow(missing_docs)]

use graft_engine::{InstanceId, LiveRegistry, LiveTarget, ObjectFactory, SampleObject, TypeTag};
use graft_reflect::{
    ClassHandle, ClassSpec, CollectionHandle, DeclaredType, FieldObject, FieldSpec, FieldValue,
    ObjectHandle, VecCollection, KEY_FIELD,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Slot class with the field shapes the engine cares about: a key, plain
/// data fields, an identity field, and a back-reference to the owning
/// collection.
pub fn slot_class() -> ClassHandle {
    ClassSpec::new("Slot")
        .field(FieldSpec::new(KEY_FIELD, DeclaredType::Str))
        .field(FieldSpec::new("capacity", DeclaredType::Int).non_public())
        .field(FieldSpec::new("locked", DeclaredType::Bool))
        .field(FieldSpec::new("instanceId", DeclaredType::Int).non_public())
        .field(FieldSpec::new("collection", DeclaredType::Collection).non_public())
        .seal()
}

/// Build a slot object with a key, a capacity, and a distinctive identity.
pub fn slot(class: &ClassHandle, key: &str, capacity: i64, instance_id: i64) -> ObjectHandle {
    let handle = ObjectHandle::new(FieldObject::with_defaults(class.clone()));
    handle.set(KEY_FIELD, FieldValue::from(key)).unwrap();
    handle.set("capacity", FieldValue::Int(capacity)).unwrap();
    handle
        .set("instanceId", FieldValue::Int(instance_id))
        .unwrap();
    handle
}

/// Build a collection holding slots for the given `(key, capacity)` pairs.
pub fn slot_collection(class: &ClassHandle, slots: &[(&str, i64)]) -> CollectionHandle {
    let collection = VecCollection::handle();
    for (index, (key, capacity)) in slots.iter().enumerate() {
        collection
            .append(slot(class, key, *capacity, 1000 + index as i64))
            .unwrap();
    }
    collection
}

/// Component exposing an enumerated `triggerMode` field.
pub fn trigger_component(variants: &[&str], current: &str) -> ObjectHandle {
    let class = ClassSpec::new("FireControl")
        .field(FieldSpec::new(
            "triggerMode",
            DeclaredType::Enum {
                type_name: "TriggerMode".to_string(),
                variants: variants.iter().map(|v| (*v).to_string()).collect(),
            },
        ))
        .seal();
    let handle = ObjectHandle::new(FieldObject::with_defaults(class));
    handle
        .set(
            "triggerMode",
            FieldValue::Enum(graft_reflect::EnumValue::new("TriggerMode", current)),
        )
        .unwrap();
    handle
}

/// Component exposing a non-enumerated field named `triggerMode`.
pub fn decoy_component() -> ObjectHandle {
    let class = ClassSpec::new("Decoy")
        .field(FieldSpec::new("triggerMode", DeclaredType::Int))
        .seal();
    ObjectHandle::new(FieldObject::with_defaults(class))
}

/// Disposable sample handing out one named collection.
pub struct FakeSample {
    property: String,
    collection: Option<CollectionHandle>,
    disposed: Arc<AtomicUsize>,
}

impl SampleObject for FakeSample {
    fn collection(&self, name: &str) -> Option<CollectionHandle> {
        (name == self.property)
            .then(|| self.collection.clone())
            .flatten()
    }

    fn dispose(&mut self) {
        self.collection = None;
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory serving clones of one configured sample.
#[derive(Clone, Default)]
pub struct FakeFactory {
    sample: Arc<Mutex<Option<(String, Option<CollectionHandle>)>>>,
    instantiated: Arc<AtomicUsize>,
    disposed: Arc<AtomicUsize>,
}

impl FakeFactory {
    /// Factory whose samples expose `collection` under the named property.
    pub fn serving(property: &str, collection: CollectionHandle) -> Self {
        Self {
            sample: Arc::new(Mutex::new(Some((property.to_string(), Some(collection))))),
            ..Self::default()
        }
    }

    /// Factory whose samples expose no collection at all.
    pub fn serving_bare(property: &str) -> Self {
        Self {
            sample: Arc::new(Mutex::new(Some((property.to_string(), None)))),
            ..Self::default()
        }
    }

    /// Factory that can never produce a sample.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn instantiated(&self) -> usize {
        self.instantiated.load(Ordering::SeqCst)
    }

    pub fn disposed(&self) -> usize {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl ObjectFactory for FakeFactory {
    fn instantiate(&self, _tag: TypeTag) -> Option<Box<dyn SampleObject>> {
        let (property, collection) = self.sample.lock().clone()?;
        self.instantiated.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(FakeSample {
            property,
            collection,
            disposed: self.disposed.clone(),
        }))
    }
}

/// Live target with fixed components and named collections.
pub struct FakeTarget {
    id: InstanceId,
    tag: TypeTag,
    components: Vec<ObjectHandle>,
    collections: HashMap<String, CollectionHandle>,
}

impl FakeTarget {
    pub fn new(id: u64, tag: TypeTag) -> Self {
        Self {
            id: InstanceId(id),
            tag,
            components: Vec::new(),
            collections: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_component(mut self, component: ObjectHandle) -> Self {
        self.components.push(component);
        self
    }

    #[must_use]
    pub fn with_collection(mut self, name: &str, collection: CollectionHandle) -> Self {
        self.collections.insert(name.to_string(), collection);
        self
    }
}

impl LiveTarget for FakeTarget {
    fn instance_id(&self) -> InstanceId {
        self.id
    }

    fn type_tag(&self) -> TypeTag {
        self.tag
    }

    fn components(&self) -> Vec<ObjectHandle> {
        self.components.clone()
    }

    fn collection(&self, name: &str) -> Option<CollectionHandle> {
        self.collections.get(name).cloned()
    }
}

/// Registry over a shared, mutable set of live targets.
#[derive(Clone, Default)]
pub struct FakeRegistry {
    targets: Arc<Mutex<Vec<Arc<FakeTarget>>>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target; returns its shared handle for later inspection.
    pub fn add(&self, target: FakeTarget) -> Arc<FakeTarget> {
        let target = Arc::new(target);
        self.targets.lock().push(target.clone());
        target
    }

    /// Remove a target from the live set (the object "despawns").
    pub fn remove(&self, id: InstanceId) {
        self.targets.lock().retain(|t| t.instance_id() != id);
    }

    pub fn len(&self) -> usize {
        self.targets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.lock().is_empty()
    }
}

impl LiveRegistry for FakeRegistry {
    fn live_objects(&self, tag: TypeTag) -> Vec<Arc<dyn LiveTarget>> {
        self.targets
            .lock()
            .iter()
            .filter(|t| t.type_tag() == tag)
            .map(|t| t.clone() as Arc<dyn LiveTarget>)
            .collect()
    }
}
