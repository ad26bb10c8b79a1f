//! Type descriptors and the resolver cache
//!
//! A [`TypeDescriptor`] is the constructible shape of a runtime type: its
//! class handle, the constructor selected by policy, and every instance
//! field. The [`DescriptorResolver`] caches descriptors by type name for the
//! lifetime of the run; entries are never invalidated, and the first
//! resolution of a type wins.

use crate::class::{ClassHandle, ConstructorSpec, FieldSpec};
use crate::error::ReflectError;
use crate::object::ObjectHandle;
use crate::value::FieldValue;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Constructible shape of one runtime type
///
/// Constructor selection prefers a zero-argument constructor and otherwise
/// takes the first declared one regardless of visibility. A type declaring
/// no constructor resolves with `constructor` unset; construction through
/// such a descriptor always fails, which downstream synthesis treats as
/// "produce nothing".
#[derive(Clone)]
pub struct TypeDescriptor {
    class: ClassHandle,
    constructor: Option<ConstructorSpec>,
    fields: Vec<FieldSpec>,
}

impl TypeDescriptor {
    /// Resolve the descriptor of a sample object's runtime type
    #[must_use]
    pub fn resolve_from(sample: &ObjectHandle) -> Self {
        Self::from_class(sample.class())
    }

    /// Resolve the descriptor of a class handle
    #[must_use]
    pub fn from_class(class: ClassHandle) -> Self {
        let constructors = class.constructors();
        let constructor = constructors
            .iter()
            .find(|c| c.is_zero_arg())
            .or_else(|| constructors.first())
            .cloned();
        let fields = class.fields();
        tracing::debug!(
            type_name = class.name(),
            fields = fields.len(),
            constructible = constructor.is_some(),
            "resolved type descriptor"
        );
        Self {
            class,
            constructor,
            fields,
        }
    }

    /// Name of the resolved type
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.class.name()
    }

    /// Every instance field of the resolved type, base-most first
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// True when a constructor was selected
    #[inline]
    #[must_use]
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Construct a new default instance
    ///
    /// Arguments for a non-zero-argument constructor are synthesized:
    /// value-semantic parameters get their type's default value,
    /// reference-semantic parameters get a null reference.
    ///
    /// # Errors
    /// - [`ReflectError::NoConstructor`] when resolution found none
    /// - Whatever the class raises when construction itself fails
    pub fn construct(&self) -> Result<ObjectHandle, ReflectError> {
        let Some(ctor) = self.constructor.as_ref() else {
            return Err(ReflectError::NoConstructor(self.type_name().to_string()));
        };
        let args: Vec<FieldValue> = ctor.params.iter().map(|p| p.ty.default_value()).collect();
        Arc::clone(&self.class).construct(ctor.index, &args)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name())
            .field("constructible", &self.is_constructible())
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Name-keyed descriptor cache, first touch wins
///
/// Written by whichever side of the engine encounters a type first and read
/// everywhere else; entries live until the resolver is dropped.
#[derive(Debug, Default)]
pub struct DescriptorResolver {
    cache: DashMap<String, Arc<TypeDescriptor>>,
}

impl DescriptorResolver {
    /// Create an empty resolver
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the descriptor for a sample's runtime type, caching it
    ///
    /// Subsequent calls with a same-typed sample are cache hits and do not
    /// re-inspect the sample.
    #[must_use]
    pub fn resolve(&self, sample: &ObjectHandle) -> Arc<TypeDescriptor> {
        let class = sample.class();
        if let Some(existing) = self.cache.get(class.name()) {
            return Arc::clone(&existing);
        }
        let name = class.name().to_string();
        let descriptor = Arc::new(TypeDescriptor::from_class(class));
        self.cache.entry(name).or_insert(descriptor).clone()
    }

    /// Fetch a cached descriptor by type name
    #[inline]
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        self.cache.get(type_name).map(|entry| Arc::clone(&entry))
    }

    /// Number of resolved types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when no type has been resolved yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
