//! Graft Template - capture side of the engine
//!
//! Captures keyed field-value templates from a reference collection and
//! synthesizes fresh instances from them later:
//! - [`SlotKey`] and the [`TemplateStore`] registry
//! - [`capture`] for best-effort per-field snapshots
//! - [`scan`] for the one-shot reference harvest
//! - [`synthesize`] for construct-and-replay with identity exclusion
//!
//! Templates are in-memory state for the current run; nothing here is
//! serialized or persisted.

#![warn(unreachable_pub)]

pub mod capture;
pub mod identity;
pub mod key;
pub mod scan;
pub mod store;
pub mod synth;

// Re-exports for convenience
pub use capture::{capture, CaptureReport};
pub use identity::is_identity_field;
pub use key::SlotKey;
pub use scan::{scan, ScanReport};
pub use store::{Template, TemplateStore};
pub use synth::{synthesize, ReplayReport, Synthesized};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
