//! Permission-kind catalogs
//!
//! Permission keys stay opaque strings throughout the engine, but the set of
//! legal keys is checked against a compile-time catalog per resource type so
//! a typo'd key is rejected at configuration time rather than silently never
//! matching.

use crate::access::permission::PermissionSet;
use crate::access::types::ResourceType;
use crate::error::ValidationError;

/// Legal permission keys for a resource type
pub fn permission_kinds(resource_type: ResourceType) -> &'static [&'static str] {
    match resource_type {
        ResourceType::Post => &[
            "read", "list", "edit", "delete", "publish", "comment", "hidden", "password",
            "redirect", "teaser",
        ],
        ResourceType::PostType | ResourceType::Taxonomy => &["list", "create", "edit", "delete"],
        ResourceType::Term => &["browse", "list", "edit", "delete", "assign"],
        ResourceType::Role => &["list", "edit", "delete", "clone", "assign"],
        ResourceType::User => &[
            "list",
            "edit",
            "delete",
            "change_password",
            "change_role",
        ],
        ResourceType::Menu => &["list", "visible"],
        ResourceType::Metabox | ResourceType::Widget => &["visible"],
        ResourceType::ApiRoute => &["allowed"],
        ResourceType::Url => &["allowed"],
        ResourceType::Capability => &["granted"],
    }
}

/// Legal permission kinds for identity governance rules
pub const GOVERNANCE_PERMISSION_KINDS: &[&str] = &[
    "list_user",
    "edit_user",
    "delete_user",
    "change_user_password",
    "change_user_role",
    "list_role",
    "edit_role",
    "delete_role",
];

/// Whether a single key is legal for the given resource type
pub fn is_legal_kind(resource_type: ResourceType, key: &str) -> bool {
    permission_kinds(resource_type).contains(&key)
}

/// Whether a key is a legal governance permission kind
pub fn is_legal_governance_kind(key: &str) -> bool {
    GOVERNANCE_PERMISSION_KINDS.contains(&key)
}

/// Validate every key in a raw permission set against the catalog
///
/// Fail-fast: the first unknown key wins.
pub fn validate_set(
    resource_type: ResourceType,
    set: &PermissionSet,
) -> Result<(), ValidationError> {
    for key in set.keys() {
        if !is_legal_kind(resource_type, key) {
            return Err(ValidationError::new(
                key.clone(),
                format!(
                    "unknown permission kind for resource type '{}'",
                    resource_type
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::permission::Permission;

    #[test]
    fn test_post_kinds() {
        assert!(is_legal_kind(ResourceType::Post, "read"));
        assert!(is_legal_kind(ResourceType::Post, "publish"));
        assert!(!is_legal_kind(ResourceType::Post, "granted"));
    }

    #[test]
    fn test_route_and_capability_kinds() {
        assert!(is_legal_kind(ResourceType::ApiRoute, "allowed"));
        assert!(is_legal_kind(ResourceType::Capability, "granted"));
        assert!(!is_legal_kind(ResourceType::Capability, "read"));
    }

    #[test]
    fn test_governance_kinds() {
        assert!(is_legal_governance_kind("list_user"));
        assert!(is_legal_governance_kind("change_user_role"));
        assert!(!is_legal_governance_kind("read"));
    }

    #[test]
    fn test_validate_set_rejects_unknown_key() {
        let mut set = PermissionSet::new();
        set.insert("read".into(), Permission::allow());
        set.insert("frobnicate".into(), Permission::deny());

        let err = validate_set(ResourceType::Post, &set).unwrap_err();
        assert_eq!(err.field, "frobnicate");
    }

    #[test]
    fn test_validate_set_accepts_known_keys() {
        let mut set = PermissionSet::new();
        set.insert("read".into(), Permission::allow());
        set.insert("edit".into(), Permission::deny());
        assert!(validate_set(ResourceType::Post, &set).is_ok());
    }
}
