//! Engine configuration
//!
//! Every name and key the engine relies on is a parameter here: the key
//! allow-list, the desired slot order, the collection property name, the
//! behavior field and its desired variant, and the cadence. Hosts override
//! what they need and validation happens once, at engine construction.

use crate::error::EngineError;
use crate::host::TypeTag;
use graft_template::SlotKey;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the patch engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Kind of the disposable reference object sampled at startup
    pub sample_tag: TypeTag,
    /// Kind of live objects eligible for patching
    pub target_tag: TypeTag,
    /// Slot keys captured from the reference object
    pub selection_keys: Vec<String>,
    /// Slot keys completed on each target, in order
    pub desired_keys: Vec<String>,
    /// Name of the collection property on samples and targets
    pub collection_property: String,
    /// Name of the enumerated behavior field patched on target components
    pub trigger_field: String,
    /// Variant name the behavior field is set to, matched case-insensitively
    pub trigger_variant: String,
    /// Field on synthesized slots pointing back at the owning collection
    pub back_reference_field: String,
    /// Delay before the one-shot reference scan
    pub startup_delay: Duration,
    /// Interval between patch ticks
    pub tick_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_tag: TypeTag(0),
            target_tag: TypeTag(0),
            selection_keys: vec!["Stock".to_string(), "Tec".to_string()],
            desired_keys: vec!["Stock".to_string(), "Tec".to_string()],
            collection_property: "Slots".to_string(),
            trigger_field: "triggerMode".to_string(),
            trigger_variant: "auto".to_string(),
            back_reference_field: "collection".to_string(),
            startup_delay: Duration::from_secs(1),
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl EngineConfig {
    /// Configuration with the built-in defaults and the given object kinds
    #[must_use]
    pub fn new(sample_tag: TypeTag, target_tag: TypeTag) -> Self {
        Self {
            sample_tag,
            target_tag,
            ..Self::default()
        }
    }

    /// Replace the capture allow-list
    #[must_use]
    pub fn with_selection_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.selection_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the ordered completion list
    #[must_use]
    pub fn with_desired_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.desired_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Rename the collection property read off samples and targets
    #[must_use]
    pub fn with_collection_property(mut self, name: impl Into<String>) -> Self {
        self.collection_property = name.into();
        self
    }

    /// Replace the behavior field name and desired variant
    #[must_use]
    pub fn with_trigger(mut self, field: impl Into<String>, variant: impl Into<String>) -> Self {
        self.trigger_field = field.into();
        self.trigger_variant = variant.into();
        self
    }

    /// Rename the back-reference field on synthesized slots
    #[must_use]
    pub fn with_back_reference_field(mut self, name: impl Into<String>) -> Self {
        self.back_reference_field = name.into();
        self
    }

    /// Replace the startup delay
    #[must_use]
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Replace the tick interval
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// The capture allow-list as slot keys
    #[must_use]
    pub fn selection_slot_keys(&self) -> Vec<SlotKey> {
        self.selection_keys
            .iter()
            .map(|k| SlotKey::from(k.as_str()))
            .collect()
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] when the tick interval is zero or the
    /// collection property is unnamed
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.tick_interval.is_zero() {
            return Err(EngineError::InvalidConfig(
                "tick interval must be non-zero".to_string(),
            ));
        }
        if self.collection_property.is_empty() {
            return Err(EngineError::InvalidConfig(
                "collection property must be named".to_string(),
            ));
        }
        Ok(())
    }
}
