//! Identity field detection
//!
//! Synthesized instances must never inherit a source object's identity, so
//! replay skips any field whose name denotes one. Matching is by name only;
//! the protocol has no other way to know what a field means.

/// Canonical internal identifier field, matched case-insensitively
pub const CANONICAL_ID_FIELD: &str = "m_instanceid";

/// True when a field name denotes an instance identity
///
/// A name matches when, case-insensitively, it contains `instanceid` or
/// `objectid`, or equals the canonical internal identifier field.
#[must_use]
pub fn is_identity_field(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("instanceid") || lower.contains("objectid") || lower == CANONICAL_ID_FIELD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_instance_id_variants() {
        assert!(is_identity_field("instanceId"));
        assert!(is_identity_field("InstanceID"));
        assert!(is_identity_field("m_InstanceId"));
        assert!(is_identity_field("sourceInstanceId"));
    }

    #[test]
    fn matches_object_id_variants() {
        assert!(is_identity_field("objectId"));
        assert!(is_identity_field("ObjectID"));
        assert!(is_identity_field("linkedObjectId"));
    }

    #[test]
    fn matches_canonical_internal_field() {
        assert!(is_identity_field("m_instanceid"));
        assert!(is_identity_field("M_INSTANCEID"));
    }

    #[test]
    fn ignores_ordinary_fields() {
        assert!(!is_identity_field("Key"));
        assert!(!is_identity_field("capacity"));
        assert!(!is_identity_field("collection"));
        assert!(!is_identity_field("identity")); // close, but not an id field
        assert!(!is_identity_field("instance"));
    }
}
