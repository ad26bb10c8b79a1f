//! Keyed template registry
//!
//! A [`Template`] is the captured field-value snapshot for one slot key,
//! together with the runtime type name it was captured from. The
//! [`TemplateStore`] holds at most one template per key; inserting again
//! overwrites (last write wins, no merge). The store lives in memory for the
//! run and is never serialized.

use crate::key::SlotKey;
use graft_reflect::FieldValue;
use indexmap::IndexMap;

/// Captured field-value snapshot for one slot key
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    key: SlotKey,
    type_name: String,
    fields: IndexMap<String, FieldValue>,
}

impl Template {
    /// Create an empty template for a key captured from the named type
    #[inline]
    #[must_use]
    pub fn new(key: SlotKey, type_name: impl Into<String>) -> Self {
        Self {
            key,
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Key this template was captured under
    #[inline]
    #[must_use]
    pub fn key(&self) -> &SlotKey {
        &self.key
    }

    /// Runtime type name the source object had at capture time
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Record one captured field value
    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Captured value of one field
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Captured fields in capture order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of captured fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field was captured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Registry of captured templates, one per slot key
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: IndexMap<SlotKey, Template>,
}

impl TemplateStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template, overwriting any existing entry for its key
    ///
    /// Returns the replaced template, if any.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.key().clone(), template)
    }

    /// Template stored for a key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Template> {
        self.templates.get(key)
    }

    /// True when a template is stored for the key
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Stored keys, in capture order
    pub fn keys(&self) -> impl Iterator<Item = &SlotKey> {
        self.templates.keys()
    }

    /// Number of stored templates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when nothing has been captured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Drop every stored template
    pub fn clear(&mut self) {
        self.templates.clear();
    }
}
