//! Graft Reflect - dynamic object protocol
//!
//! The introspection capability the rest of the workspace is built on:
//! - Type-erased field values ([`FieldValue`])
//! - Runtime type handles with field enumeration and construction
//!   ([`DynClass`], [`ClassSpec`])
//! - Per-instance field access behind shared handles ([`DynObject`],
//!   [`ObjectHandle`], [`FieldObject`])
//! - The enumerate-and-append collection protocol ([`SlotCollection`])
//! - Type descriptors with constructor selection and the first-touch-wins
//!   resolver cache ([`TypeDescriptor`], [`DescriptorResolver`])
//!
//! Hosts with a native object system implement the protocol traits over
//! their own handles; the in-memory implementations here back tests and
//! hosts without one.

#![warn(unreachable_pub)]

pub mod class;
pub mod collection;
pub mod descriptor;
pub mod error;
pub mod object;
pub mod value;

// Re-exports for convenience
pub use class::{
    ClassHandle, ClassSpec, ConstructorSpec, DeclaredType, DynClass, FieldSpec, ParamSpec,
    Visibility,
};
pub use collection::{element_key, CollectionHandle, SlotCollection, VecCollection, KEY_FIELD};
pub use descriptor::{DescriptorResolver, TypeDescriptor};
pub use error::ReflectError;
pub use object::{DynObject, FieldObject, ObjectHandle};
pub use value::{EnumValue, FieldValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
