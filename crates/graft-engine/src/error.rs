//! Error types for the patch engine
//!
//! Runtime degradation is silent by contract; the only errors the engine
//! ever surfaces are configuration problems caught at construction.

/// Errors raised when building an engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration was rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
