//! Instance synthesizer
//!
//! Synthesis constructs a brand-new instance of a captured type and replays
//! the stored template onto it, field by field. Identity fields are never
//! replayed; a synthesized instance always keeps its own fresh identity.
//! Replay is best-effort per field, and a failed construction yields nothing
//! rather than a partially-built instance.

use crate::identity::is_identity_field;
use crate::store::TemplateStore;
use graft_reflect::{DescriptorResolver, ObjectHandle, ReflectError};

/// Fields applied, skipped, and failed during one replay
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Template fields written onto the new instance
    pub applied: usize,
    /// Fields excluded because their name denotes an identity
    pub skipped_identity: Vec<String>,
    /// Fields whose write failed; the rest of the replay proceeded
    pub failed: Vec<(String, ReflectError)>,
}

/// A freshly synthesized instance plus its replay report
#[derive(Debug)]
pub struct Synthesized {
    /// The new instance
    pub instance: ObjectHandle,
    /// What the replay did
    pub report: ReplayReport,
}

/// Construct a new instance for `key` and replay its stored template
///
/// Returns `None` when no template is stored for the key, when the
/// template's type has no cached descriptor, or when construction fails.
#[must_use]
pub fn synthesize(
    key: &str,
    resolver: &DescriptorResolver,
    store: &TemplateStore,
) -> Option<Synthesized> {
    let template = store.get(key)?;
    let descriptor = resolver.get(template.type_name())?;

    let instance = match descriptor.construct() {
        Ok(instance) => instance,
        Err(error) => {
            tracing::debug!(key, %error, "construction failed, synthesizing nothing");
            return None;
        }
    };

    let mut report = ReplayReport::default();
    for field in descriptor.fields() {
        if is_identity_field(&field.name) {
            report.skipped_identity.push(field.name.clone());
            continue;
        }
        let Some(value) = template.get(&field.name) else {
            continue;
        };
        match instance.set(&field.name, value.clone()) {
            Ok(()) => report.applied += 1,
            Err(error) => {
                tracing::trace!(key, field = %field.name, %error, "field replay failed");
                report.failed.push((field.name.clone(), error));
            }
        }
    }

    tracing::debug!(
        key,
        applied = report.applied,
        skipped = report.skipped_identity.len(),
        failed = report.failed.len(),
        "synthesized instance"
    );
    Some(Synthesized { instance, report })
}
