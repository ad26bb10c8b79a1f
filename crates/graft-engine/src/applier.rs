//! Live patch applier
//!
//! Each tick enumerates the live candidates of the target kind and patches
//! every one it has not seen before: behavior field first, then slot
//! completion. An identifier goes from unseen to processed exactly once and
//! never back, even when a sub-step fails; identifiers that leave the live
//! set are pruned so the processed set stays bounded.

use crate::config::EngineConfig;
use crate::host::{InstanceId, LiveRegistry, LiveTarget};
use graft_reflect::{element_key, DeclaredType, DescriptorResolver, EnumValue, FieldValue};
use graft_template::{synthesize, TemplateStore};
use std::collections::HashSet;

/// Counters for one applier tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// False when the preconditions (resolved descriptor, non-empty store)
    /// did not hold and the tick was a no-op
    pub ran: bool,
    /// Live candidates enumerated
    pub live: usize,
    /// Identifiers marked processed this tick
    pub newly_processed: usize,
    /// Behavior fields patched this tick
    pub triggers_patched: usize,
    /// Slots synthesized and appended this tick
    pub slots_added: usize,
    /// Stale identifiers pruned from the processed set
    pub pruned: usize,
}

/// Applies captured templates to live targets, at most once per instance
#[derive(Debug, Default)]
pub struct PatchApplier {
    processed: HashSet<InstanceId>,
}

impl PatchApplier {
    /// Create an applier with an empty processed set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identifiers currently marked processed
    #[inline]
    #[must_use]
    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }

    /// True when the identifier has already been patched
    #[inline]
    #[must_use]
    pub fn is_processed(&self, id: InstanceId) -> bool {
        self.processed.contains(&id)
    }

    /// Clear all processed tracking
    ///
    /// Patches already applied to live targets are not rolled back.
    pub fn reset(&mut self) {
        self.processed.clear();
    }

    /// One synchronous patch pass over the live candidates
    pub fn tick(
        &mut self,
        config: &EngineConfig,
        registry: &dyn LiveRegistry,
        resolver: &DescriptorResolver,
        store: &TemplateStore,
    ) -> TickReport {
        let mut report = TickReport::default();
        if resolver.is_empty() || store.is_empty() {
            return report;
        }
        report.ran = true;

        let live = registry.live_objects(config.target_tag);
        report.live = live.len();

        let mut seen = HashSet::with_capacity(live.len());
        for target in &live {
            let id = target.instance_id();
            seen.insert(id);
            if !self.processed.insert(id) {
                continue;
            }
            report.newly_processed += 1;
            tracing::debug!(%id, "patching live target");

            // Behavior field first, slot completion second; a failure in
            // either never blocks the other and never un-marks the id.
            if patch_trigger(config, target.as_ref()) {
                report.triggers_patched += 1;
            }
            report.slots_added += complete_slots(config, target.as_ref(), resolver, store);
        }

        let before = self.processed.len();
        self.processed.retain(|id| seen.contains(id));
        report.pruned = before - self.processed.len();
        if report.pruned > 0 {
            tracing::debug!(pruned = report.pruned, "pruned stale processed entries");
        }

        report
    }
}

/// Set the configured enumerated behavior field to the desired variant
///
/// The first component exposing an enumerated field of the configured name
/// ends the search, whether or not the desired variant exists on it.
/// Components exposing a same-named non-enumerated field are passed over.
fn patch_trigger(config: &EngineConfig, target: &dyn LiveTarget) -> bool {
    for component in target.components() {
        let Some((type_name, variants)) = enum_field(&component, &config.trigger_field) else {
            continue;
        };
        let Some(variant) = variants
            .iter()
            .find(|v| v.eq_ignore_ascii_case(&config.trigger_variant))
        else {
            tracing::debug!(
                field = %config.trigger_field,
                desired = %config.trigger_variant,
                "enumeration lacks the desired variant"
            );
            return false;
        };
        let value = FieldValue::Enum(EnumValue::new(type_name, variant.clone()));
        return match component.set(&config.trigger_field, value) {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(field = %config.trigger_field, %error, "behavior field patch failed");
                false
            }
        };
    }
    false
}

/// Enumerated field of the given name on the component's type, if any
fn enum_field(component: &graft_reflect::ObjectHandle, name: &str) -> Option<(String, Vec<String>)> {
    component
        .class()
        .fields()
        .into_iter()
        .find(|f| f.name == name)
        .and_then(|f| match f.ty {
            DeclaredType::Enum {
                type_name,
                variants,
            } => Some((type_name, variants)),
            _ => None,
        })
}

/// Synthesize and append slots for desired keys missing from the target
fn complete_slots(
    config: &EngineConfig,
    target: &dyn LiveTarget,
    resolver: &DescriptorResolver,
    store: &TemplateStore,
) -> usize {
    let Some(collection) = target.collection(&config.collection_property) else {
        return 0;
    };

    let existing: HashSet<String> = collection
        .elements()
        .iter()
        .filter_map(element_key)
        .filter(|key| !key.is_empty())
        .collect();

    let mut added = 0;
    for key in &config.desired_keys {
        if existing.contains(key) || !store.contains(key) {
            continue;
        }
        let Some(synthesized) = synthesize(key, resolver, store) else {
            continue;
        };
        let instance = synthesized.instance;

        // Rewire the back-reference before handing the slot over; a type
        // without the field is tolerated.
        if let Err(error) = instance.set(
            &config.back_reference_field,
            FieldValue::Collection(collection.clone()),
        ) {
            tracing::trace!(key = %key, %error, "back-reference not rewired");
        }

        match collection.append(instance) {
            Ok(()) => {
                added += 1;
                tracing::debug!(key = %key, "appended synthesized slot");
            }
            Err(error) => tracing::debug!(key = %key, %error, "append failed"),
        }
    }
    added
}
