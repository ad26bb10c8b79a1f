//! Graft Engine - live patch engine
//!
//! Samples a disposable reference object once, captures slot templates from
//! it, then patches live targets on a cadence: sets a configured enumerated
//! behavior field and completes missing slots from the captured templates,
//! at most once per live instance. Degradation is silent by contract — a
//! missing reference, an unconstructible type, or a failing field leaves the
//! host untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use graft_engine::{Engine, EngineConfig, TypeTag};
//!
//! # async fn example(factory: Box<dyn graft_engine::ObjectFactory>,
//! #                  registry: Box<dyn graft_engine::LiveRegistry>) {
//! let config = EngineConfig::new(TypeTag(786), TypeTag(787));
//! let mut engine = Engine::new(config, factory, registry).unwrap();
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! tokio::spawn(async move { engine.run(shutdown_rx).await });
//! // ... host runs ...
//! let _ = shutdown_tx.send(true);
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod applier;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;

// Re-exports for convenience
pub use applier::{PatchApplier, TickReport};
pub use config::EngineConfig;
pub use engine::{Engine, EngineStats};
pub use error::EngineError;
pub use host::{InstanceId, LiveRegistry, LiveTarget, ObjectFactory, SampleObject, TypeTag};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the patch engine
    pub use crate::{
        Engine, EngineConfig, EngineStats, InstanceId, LiveRegistry, LiveTarget, ObjectFactory,
        SampleObject, TickReport, TypeTag,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
