//! Runtime type handles
//!
//! [`DynClass`] is the runtime-type capability: name, instance-field
//! enumeration, declared constructors, and construction. [`ClassSpec`] is the
//! reusable in-memory implementation, built in builder style; hosts with a
//! native object system implement [`DynClass`] over their own type handles
//! instead.

use crate::error::ReflectError;
use crate::object::{DynObject, FieldObject, ObjectHandle};
use crate::value::{EnumValue, FieldValue};
use std::sync::Arc;

/// Accessibility of a declared member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Publicly accessible
    #[default]
    Public,
    /// Not publicly accessible; still enumerated and still settable
    NonPublic,
}

/// Declared type of a field or constructor parameter
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    /// Boolean scalar
    Bool,
    /// Integer scalar
    Int,
    /// Floating-point scalar
    Float,
    /// String reference
    Str,
    /// Enumeration with named variants, in declaration order
    Enum {
        /// Name of the enum type
        type_name: String,
        /// Variant names in declaration order
        variants: Vec<String>,
    },
    /// Reference to an object of the named type
    Object {
        /// Name of the referenced type
        type_name: String,
    },
    /// Reference to a slot collection
    Collection,
    /// Host payload the protocol does not interpret
    Opaque,
}

impl DeclaredType {
    /// Value-semantic types get a synthesized default when used as a
    /// constructor parameter; reference-semantic types get a null reference.
    #[inline]
    #[must_use]
    pub fn is_value_semantic(&self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float | Self::Enum { .. })
    }

    /// Default value of this type
    ///
    /// Value-semantic types yield their zero value (an enum yields its first
    /// variant); reference-semantic types yield [`FieldValue::Null`].
    #[must_use]
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Bool => FieldValue::Bool(false),
            Self::Int => FieldValue::Int(0),
            Self::Float => FieldValue::Float(0.0),
            Self::Enum {
                type_name,
                variants,
            } => variants
                .first()
                .map_or(FieldValue::Null, |v| {
                    FieldValue::Enum(EnumValue::new(type_name.clone(), v.clone()))
                }),
            Self::Str | Self::Object { .. } | Self::Collection | Self::Opaque => FieldValue::Null,
        }
    }
}

/// A declared instance field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name
    pub name: String,
    /// Declared type
    pub ty: DeclaredType,
    /// Accessibility; enumeration ignores it
    pub visibility: Visibility,
}

impl FieldSpec {
    /// Declare a public field
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
        }
    }

    /// Mark the field non-public
    #[inline]
    #[must_use]
    pub fn non_public(mut self) -> Self {
        self.visibility = Visibility::NonPublic;
        self
    }
}

/// A declared constructor parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name; bound to a same-named field when one exists
    pub name: String,
    /// Declared type
    pub ty: DeclaredType,
}

impl ParamSpec {
    /// Declare a parameter
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ty: DeclaredType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A constructor as declared by a class
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorSpec {
    /// Position within the type's constructor list
    pub index: usize,
    /// Declared parameters, in order
    pub params: Vec<ParamSpec>,
    /// Accessibility; selection ignores it
    pub visibility: Visibility,
}

impl ConstructorSpec {
    /// True when the constructor takes no arguments
    #[inline]
    #[must_use]
    pub fn is_zero_arg(&self) -> bool {
        self.params.is_empty()
    }
}

/// Shared handle to a runtime type
pub type ClassHandle = Arc<dyn DynClass>;

/// Runtime type protocol
///
/// # Contract
/// - `fields()` returns every instance field at every inheritance level
///   reachable from the type, base-most first, regardless of accessibility.
/// - `constructors()` returns declared constructors in declaration order;
///   an empty list means the type cannot be constructed.
/// - `construct()` either produces a fully-initialized instance or an error;
///   it never hands out a partially-built object.
pub trait DynClass: Send + Sync {
    /// Runtime type name
    fn name(&self) -> &str;

    /// Every instance field, including inherited and non-public ones
    fn fields(&self) -> Vec<FieldSpec>;

    /// Declared constructors, in declaration order
    fn constructors(&self) -> Vec<ConstructorSpec>;

    /// Construct a new instance through the constructor at `index`
    ///
    /// # Errors
    /// - [`ReflectError::UnknownConstructor`] when `index` is out of range
    /// - [`ReflectError::ArityMismatch`] when `args` does not match the
    ///   declared parameter count
    /// - [`ReflectError::ConstructionFailed`] when the host cannot produce
    ///   the instance
    fn construct(
        self: Arc<Self>,
        index: usize,
        args: &[FieldValue],
    ) -> Result<ObjectHandle, ReflectError>;
}

/// Builder-style in-memory class
///
/// Instances constructed through a `ClassSpec` are [`FieldObject`]s holding
/// every declared field (own and inherited) at its type's default value.
/// Constructor parameters whose name matches a declared field are bound to
/// that field on construction.
pub struct ClassSpec {
    name: String,
    parent: Option<ClassHandle>,
    fields: Vec<FieldSpec>,
    declared_ctors: Vec<(Vec<ParamSpec>, Visibility)>,
    constructible: bool,
}

impl ClassSpec {
    /// Start a class; unless constructors are declared or suppressed, the
    /// class gets one implicit public zero-argument constructor
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            declared_ctors: Vec::new(),
            constructible: true,
        }
    }

    /// Inherit fields from a parent class
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: ClassHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declare an instance field
    #[inline]
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declare a constructor; replaces the implicit zero-argument one
    #[inline]
    #[must_use]
    pub fn constructor(mut self, params: Vec<ParamSpec>, visibility: Visibility) -> Self {
        self.declared_ctors.push((params, visibility));
        self
    }

    /// Declare the class non-constructible (no constructors at all)
    #[inline]
    #[must_use]
    pub fn without_constructors(mut self) -> Self {
        self.constructible = false;
        self
    }

    /// Finish building and produce the shared type handle
    #[inline]
    #[must_use]
    pub fn seal(self) -> ClassHandle {
        Arc::new(self)
    }
}

impl std::fmt::Debug for ClassSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassSpec")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name().to_string()))
            .field("fields", &self.fields.len())
            .field("constructors", &self.constructors().len())
            .finish()
    }
}

impl DynClass for ClassSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<FieldSpec> {
        let mut all = self
            .parent
            .as_ref()
            .map(|p| p.fields())
            .unwrap_or_default();
        all.extend(self.fields.iter().cloned());
        all
    }

    fn constructors(&self) -> Vec<ConstructorSpec> {
        if !self.constructible {
            return Vec::new();
        }
        if self.declared_ctors.is_empty() {
            return vec![ConstructorSpec {
                index: 0,
                params: Vec::new(),
                visibility: Visibility::Public,
            }];
        }
        self.declared_ctors
            .iter()
            .enumerate()
            .map(|(index, (params, visibility))| ConstructorSpec {
                index,
                params: params.clone(),
                visibility: *visibility,
            })
            .collect()
    }

    fn construct(
        self: Arc<Self>,
        index: usize,
        args: &[FieldValue],
    ) -> Result<ObjectHandle, ReflectError> {
        let ctors = self.constructors();
        let Some(ctor) = ctors.get(index) else {
            return Err(ReflectError::UnknownConstructor {
                type_name: self.name.clone(),
                index,
            });
        };
        if ctor.params.len() != args.len() {
            return Err(ReflectError::ArityMismatch {
                type_name: self.name.clone(),
                expected: ctor.params.len(),
                got: args.len(),
            });
        }

        let class: ClassHandle = self.clone();
        let mut object = FieldObject::with_defaults(class);
        for (param, arg) in ctor.params.iter().zip(args) {
            if object.has_field(&param.name) {
                object.set(&param.name, arg.clone())?;
            }
        }
        Ok(ObjectHandle::new(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn slot_class() -> ClassHandle {
        ClassSpec::new("Slot")
            .field(FieldSpec::new("Key", DeclaredType::Str))
            .field(FieldSpec::new("capacity", DeclaredType::Int).non_public())
            .seal()
    }

    #[test]
    fn implicit_zero_arg_constructor() {
        let class = slot_class();
        let ctors = class.constructors();
        assert_eq!(ctors.len(), 1);
        assert!(ctors[0].is_zero_arg());
        assert_eq!(ctors[0].visibility, Visibility::Public);
    }

    #[test]
    fn without_constructors_yields_none() {
        let class = ClassSpec::new("Opaque").without_constructors().seal();
        assert!(class.constructors().is_empty());
    }

    #[test]
    fn construct_applies_field_defaults() {
        let class = slot_class();
        let object = class.construct(0, &[]).unwrap();
        assert_eq!(object.get("Key").unwrap(), FieldValue::Null);
        assert_eq!(object.get("capacity").unwrap(), FieldValue::Int(0));
    }

    #[test]
    fn construct_binds_named_parameters() {
        let class = ClassSpec::new("Slot")
            .field(FieldSpec::new("capacity", DeclaredType::Int))
            .constructor(
                vec![ParamSpec::new("capacity", DeclaredType::Int)],
                Visibility::NonPublic,
            )
            .seal();

        let object = class.construct(0, &[FieldValue::Int(8)]).unwrap();
        assert_eq!(object.get("capacity").unwrap(), FieldValue::Int(8));
    }

    #[test]
    fn construct_rejects_wrong_arity() {
        let class = slot_class();
        let err = class.construct(0, &[FieldValue::Int(1)]).unwrap_err();
        assert!(matches!(err, ReflectError::ArityMismatch { .. }));
    }

    #[test]
    fn construct_rejects_unknown_index() {
        let class = slot_class();
        let err = class.construct(3, &[]).unwrap_err();
        assert!(matches!(err, ReflectError::UnknownConstructor { index: 3, .. }));
    }

    #[test]
    fn fields_include_inherited_base_first() {
        let base = ClassSpec::new("Base")
            .field(FieldSpec::new("m_instanceId", DeclaredType::Int).non_public())
            .seal();
        let class = ClassSpec::new("Slot")
            .with_parent(base)
            .field(FieldSpec::new("Key", DeclaredType::Str))
            .seal();

        let names: Vec<_> = class.fields().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["m_instanceId".to_string(), "Key".to_string()]);
    }

    #[test]
    fn enum_default_is_first_variant() {
        let ty = DeclaredType::Enum {
            type_name: "TriggerMode".to_string(),
            variants: vec!["Semi".to_string(), "Auto".to_string()],
        };
        let value = ty.default_value();
        assert_eq!(value.as_enum().unwrap().variant, "Semi");
    }

    #[test]
    fn reference_defaults_are_null() {
        assert!(DeclaredType::Str.default_value().is_null());
        assert!(DeclaredType::Collection.default_value().is_null());
        assert!(!DeclaredType::Str.is_value_semantic());
        assert!(DeclaredType::Int.is_value_semantic());
    }
}
