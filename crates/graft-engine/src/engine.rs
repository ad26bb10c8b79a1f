//! Engine facade
//!
//! Owns all mutable core state — descriptor cache, template store, processed
//! set — with a defined lifecycle: constructed empty, populated by the
//! one-shot reference scan, cleared on teardown. Hosts either hand the
//! engine to [`Engine::run`] and let the runtime drive it, or call
//! [`Engine::capture_once`] and [`Engine::tick`] from their own loop.

use crate::applier::{PatchApplier, TickReport};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::host::{LiveRegistry, ObjectFactory};
use graft_reflect::DescriptorResolver;
use graft_template::{scan, ScanReport, TemplateStore};
use std::fmt;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Monitoring snapshot of engine state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Types with a resolved descriptor
    pub resolved_types: usize,
    /// Templates currently stored
    pub templates: usize,
    /// Identifiers currently marked processed
    pub processed: usize,
    /// Patch ticks executed so far
    pub ticks: u64,
}

/// The capture-and-replay engine
pub struct Engine {
    config: EngineConfig,
    factory: Box<dyn ObjectFactory>,
    registry: Box<dyn LiveRegistry>,
    resolver: DescriptorResolver,
    store: TemplateStore,
    applier: PatchApplier,
    ticks: u64,
}

impl Engine {
    /// Create an engine with empty state
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] when the configuration is unusable
    pub fn new(
        config: EngineConfig,
        factory: Box<dyn ObjectFactory>,
        registry: Box<dyn LiveRegistry>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            factory,
            registry,
            resolver: DescriptorResolver::new(),
            store: TemplateStore::new(),
            applier: PatchApplier::new(),
            ticks: 0,
        })
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the stored templates
    #[inline]
    #[must_use]
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Monitoring snapshot
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            resolved_types: self.resolver.len(),
            templates: self.store.len(),
            processed: self.applier.processed_len(),
            ticks: self.ticks,
        }
    }

    /// One-shot reference scan
    ///
    /// Obtains a disposable sample from the factory, harvests templates from
    /// its collection, then disposes of the sample. A missing sample or a
    /// sample without the collection property is "nothing to learn this
    /// run", not an error.
    pub fn capture_once(&mut self) -> ScanReport {
        let Some(mut sample) = self.factory.instantiate(self.config.sample_tag) else {
            tracing::debug!(tag = %self.config.sample_tag, "no reference object available");
            return ScanReport::default();
        };

        let report = match sample.collection(&self.config.collection_property) {
            Some(collection) => scan(
                &collection,
                &self.config.selection_slot_keys(),
                &self.resolver,
                &mut self.store,
            ),
            None => {
                tracing::debug!(
                    property = %self.config.collection_property,
                    "reference object has no slot collection"
                );
                ScanReport::default()
            }
        };
        sample.dispose();

        tracing::info!(
            examined = report.examined,
            captured = report.captured.len(),
            "reference scan complete"
        );
        report
    }

    /// One synchronous patch pass
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        self.applier
            .tick(&self.config, self.registry.as_ref(), &self.resolver, &self.store)
    }

    /// Drive the engine until the shutdown signal flips to `true`
    ///
    /// Waits out the startup delay (abortable), runs the reference scan
    /// once, then ticks on the configured cadence. Missed ticks are skipped,
    /// not replayed. Tears down on exit.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        tokio::select! {
            () = tokio::time::sleep(self.config.startup_delay) => {}
            _ = shutdown.changed() => {
                self.teardown();
                return;
            }
        }

        self.capture_once();

        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick();
                }
                _ = shutdown.changed() => break,
            }
        }
        self.teardown();
    }

    /// Clear processed tracking
    ///
    /// Patches already applied to live targets stay applied; captured
    /// templates and resolved descriptors live until the engine is dropped.
    pub fn teardown(&mut self) {
        self.applier.reset();
        tracing::debug!("engine torn down");
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
