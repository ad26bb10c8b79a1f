//! Structural scanner
//!
//! One-shot harvest of slot templates from a reference collection. The first
//! element encountered resolves the slot type descriptor, whether or not its
//! key is selected; elements whose key is on the allow-list are captured into
//! the store, overwriting any earlier capture of the same key.

use crate::capture::capture;
use crate::key::SlotKey;
use crate::store::TemplateStore;
use graft_reflect::{element_key, CollectionHandle, DescriptorResolver};

/// Outcome of one reference scan
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Elements examined
    pub examined: usize,
    /// Keys captured, in collection order
    pub captured: Vec<SlotKey>,
    /// Type name resolved from the first element, if any
    pub resolved_type: Option<String>,
}

impl ScanReport {
    /// True when nothing was learned this run
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captured.is_empty()
    }
}

/// Walk a reference collection and capture templates for selected keys
///
/// An empty collection is "nothing to learn this run", not an error. Elements
/// without a readable key still feed descriptor resolution but are never
/// captured.
pub fn scan(
    collection: &CollectionHandle,
    selection: &[SlotKey],
    resolver: &DescriptorResolver,
    store: &mut TemplateStore,
) -> ScanReport {
    let mut report = ScanReport::default();

    for element in collection.elements() {
        report.examined += 1;

        let descriptor = resolver.resolve(&element);
        if report.resolved_type.is_none() {
            report.resolved_type = Some(descriptor.type_name().to_string());
        }

        let Some(key) = element_key(&element) else {
            continue;
        };
        if !selection.iter().any(|selected| selected.as_str() == key) {
            continue;
        }

        let key = SlotKey::from(key);
        let (template, capture_report) = capture(&descriptor, &element, key.clone());
        tracing::debug!(
            key = %key,
            captured = capture_report.captured,
            omitted = capture_report.omitted.len(),
            "captured slot template"
        );
        store.insert(template);
        report.captured.push(key);
    }

    report
}
