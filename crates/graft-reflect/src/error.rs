//! Error types for the dynamic object protocol
//!
//! Every field access and every construction attempt is fallible; callers
//! decide whether a failure aborts the surrounding operation or only the
//! single step that raised it.

/// Errors raised by dynamic field access and instance construction
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReflectError {
    /// Field is not declared on the object's type
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Field exists but could not be read
    #[error("read of field {field} failed: {reason}")]
    ReadFailed {
        /// Field that failed to read
        field: String,
        /// Host-supplied reason
        reason: String,
    },

    /// Field exists but could not be written
    #[error("write of field {field} failed: {reason}")]
    WriteFailed {
        /// Field that failed to write
        field: String,
        /// Host-supplied reason
        reason: String,
    },

    /// Type declares no usable constructor
    #[error("no constructor available for type {0}")]
    NoConstructor(String),

    /// Constructor index does not exist on the type
    #[error("constructor {index} not found on type {type_name}")]
    UnknownConstructor {
        /// Declaring type
        type_name: String,
        /// Requested constructor index
        index: usize,
    },

    /// Constructor invoked with the wrong number of arguments
    #[error("constructor of {type_name} expects {expected} arguments, got {got}")]
    ArityMismatch {
        /// Declaring type
        type_name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Construction started but did not produce an instance
    #[error("construction of {type_name} failed: {reason}")]
    ConstructionFailed {
        /// Type under construction
        type_name: String,
        /// Host-supplied reason
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_lowercase() {
        let err = ReflectError::UnknownField("Key".to_string());
        assert_eq!(err.to_string(), "unknown field: Key");

        let err = ReflectError::NoConstructor("Slot".to_string());
        assert!(err.to_string().starts_with("no constructor"));
    }

    #[test]
    fn error_is_cloneable() {
        let err = ReflectError::ReadFailed {
            field: "capacity".to_string(),
            reason: "detached".to_string(),
        };
        let clone = err.clone();
        assert_eq!(err.to_string(), clone.to_string());
    }
}
