//! Field capture from live objects
//!
//! Capture walks every instance field the descriptor enumerates and snapshots
//! whatever the source object will hand out. A field whose read fails is
//! omitted from the snapshot; it never aborts the capture of the others.

use crate::key::SlotKey;
use crate::store::Template;
use graft_reflect::{ObjectHandle, ReflectError, TypeDescriptor};

/// Outcome of one capture pass
#[derive(Debug, Default)]
pub struct CaptureReport {
    /// Fields successfully captured
    pub captured: usize,
    /// Fields omitted because their read failed
    pub omitted: Vec<(String, ReflectError)>,
}

impl CaptureReport {
    /// True when every enumerated field was captured
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.omitted.is_empty()
    }
}

/// Capture every instance field of `source` into a template for `key`
///
/// The snapshot is keyed by field name and ordered by the descriptor's field
/// enumeration. Values are copied out of the source; later mutation of the
/// source never changes the template.
#[must_use]
pub fn capture(
    descriptor: &TypeDescriptor,
    source: &ObjectHandle,
    key: SlotKey,
) -> (Template, CaptureReport) {
    let mut template = Template::new(key, descriptor.type_name());
    let mut report = CaptureReport::default();

    for field in descriptor.fields() {
        match source.get(&field.name) {
            Ok(value) => {
                template.insert(field.name.clone(), value);
                report.captured += 1;
            }
            Err(error) => {
                tracing::trace!(field = %field.name, %error, "field read failed, omitting");
                report.omitted.push((field.name.clone(), error));
            }
        }
    }

    (template, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_reflect::{
        ClassHandle, ClassSpec, DeclaredType, DynObject, FieldObject, FieldSpec, FieldValue,
        ObjectHandle,
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn slot_class() -> ClassHandle {
        ClassSpec::new("Slot")
            .field(FieldSpec::new("Key", DeclaredType::Str))
            .field(FieldSpec::new("capacity", DeclaredType::Int).non_public())
            .field(FieldSpec::new("locked", DeclaredType::Bool))
            .seal()
    }

    fn slot(key: &str, capacity: i64) -> ObjectHandle {
        let handle = ObjectHandle::new(FieldObject::with_defaults(slot_class()));
        handle.set("Key", FieldValue::from(key)).unwrap();
        handle.set("capacity", FieldValue::Int(capacity)).unwrap();
        handle
    }

    #[test]
    fn captures_all_fields_regardless_of_visibility() {
        let source = slot("Stock", 4);
        let descriptor = TypeDescriptor::resolve_from(&source);

        let (template, report) = capture(&descriptor, &source, SlotKey::from("Stock"));
        assert!(report.is_complete());
        assert_eq!(report.captured, 3);
        assert_eq!(template.get("Key").unwrap().as_str(), Some("Stock"));
        assert_eq!(template.get("capacity"), Some(&FieldValue::Int(4)));
        assert_eq!(template.get("locked"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn template_is_a_copy_of_the_source() {
        let source = slot("Stock", 4);
        let descriptor = TypeDescriptor::resolve_from(&source);
        let (template, _) = capture(&descriptor, &source, SlotKey::from("Stock"));

        source.set("capacity", FieldValue::Int(99)).unwrap();
        assert_eq!(template.get("capacity"), Some(&FieldValue::Int(4)));
    }

    #[test]
    fn failed_field_read_is_omitted_not_fatal() {
        // An object that refuses to hand out one of its declared fields.
        struct Grudging {
            class: ClassHandle,
        }

        impl DynObject for Grudging {
            fn class(&self) -> ClassHandle {
                self.class.clone()
            }

            fn get(&self, field: &str) -> Result<FieldValue, graft_reflect::ReflectError> {
                if field == "capacity" {
                    return Err(graft_reflect::ReflectError::ReadFailed {
                        field: field.to_string(),
                        reason: "detached".to_string(),
                    });
                }
                Ok(FieldValue::Int(7))
            }

            fn set(
                &mut self,
                field: &str,
                _value: FieldValue,
            ) -> Result<(), graft_reflect::ReflectError> {
                Err(graft_reflect::ReflectError::UnknownField(field.to_string()))
            }
        }

        let source = ObjectHandle::new(Grudging {
            class: slot_class(),
        });
        let descriptor = TypeDescriptor::resolve_from(&source);

        let (template, report) = capture(&descriptor, &source, SlotKey::from("Stock"));
        assert_eq!(report.captured, 2);
        assert_eq!(report.omitted.len(), 1);
        assert_eq!(report.omitted[0].0, "capacity");
        assert!(template.get("capacity").is_none());
        assert!(template.get("Key").is_some());
    }

    proptest! {
        // Capturing the same source twice yields identical templates.
        #[test]
        fn prop_capture_is_idempotent(
            fields in proptest::collection::hash_map("[a-z]{1,8}", any::<i64>(), 1..8)
        ) {
            let mut class = ClassSpec::new("Slot");
            for name in fields.keys() {
                class = class.field(FieldSpec::new(name.clone(), DeclaredType::Int));
            }
            let source = ObjectHandle::new(FieldObject::with_defaults(class.seal()));
            for (name, value) in &fields {
                source.set(name, FieldValue::Int(*value)).unwrap();
            }
            let descriptor = TypeDescriptor::resolve_from(&source);

            let (first, _) = capture(&descriptor, &source, SlotKey::from("Stock"));
            let (second, _) = capture(&descriptor, &source, SlotKey::from("Stock"));
            prop_assert_eq!(first, second);
        }
    }
}
