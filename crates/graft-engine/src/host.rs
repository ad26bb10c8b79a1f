//! Host collaborator interfaces
//!
//! The engine never owns the object graph it patches; it reaches it through
//! these narrow interfaces. A host binds them once: a factory that can
//! produce a disposable reference object, and a registry that can enumerate
//! the currently-live candidates.

use graft_reflect::{CollectionHandle, ObjectHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Process-wide stable identifier of a live object
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification tag distinguishing object kinds in the host
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TypeTag(pub u32);

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A disposable sample object obtained from the factory
///
/// Exists only to be inspected; the engine disposes of it as soon as the
/// scan finishes.
pub trait SampleObject: Send {
    /// Named collection property, when the sample has one
    fn collection(&self, name: &str) -> Option<CollectionHandle>;

    /// Explicitly discard the sample
    fn dispose(&mut self);
}

/// Object factory producing disposable reference objects
pub trait ObjectFactory: Send + Sync {
    /// Instantiate a sample of the given kind; `None` when unavailable
    fn instantiate(&self, tag: TypeTag) -> Option<Box<dyn SampleObject>>;
}

/// A live candidate object eligible for patching
pub trait LiveTarget: Send + Sync {
    /// Stable process-wide identifier
    fn instance_id(&self) -> InstanceId;

    /// Classification tag
    fn type_tag(&self) -> TypeTag;

    /// Attached behavior components, in attachment order
    fn components(&self) -> Vec<ObjectHandle>;

    /// Named collection property, when the target has one
    fn collection(&self, name: &str) -> Option<CollectionHandle>;
}

/// Registry of currently-live objects
pub trait LiveRegistry: Send + Sync {
    /// All currently-live objects of the given kind
    fn live_objects(&self, tag: TypeTag) -> Vec<Arc<dyn LiveTarget>>;
}
