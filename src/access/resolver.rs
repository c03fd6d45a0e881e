//! Permission resolver
//!
//! Walks the access-level fallback chain and merges raw permission sets
//! into one effective set per resource, highest specificity winning per
//! key:
//!
//! 1. `User(id)` with explicit per-user overrides
//! 2. The user's roles, in assigned order (earliest role wins ties)
//! 3. `Default`, the site-wide baseline
//!
//! `Role(slug)` resolves through `Role → Default`; `Visitor` falls back
//! only to `Default`, never to a role or user level.

use crate::access::permission::{EffectivePermission, PermissionSet};
use crate::access::types::{AccessLevel, ResourceRef};
use crate::error::{ResolveError, ResolveResult};
use crate::extension::PolicyExtension;
use crate::principal::PrincipalCatalog;
use crate::store::PermissionStore;
use std::sync::Arc;
use tracing::{debug, trace};

/// Build the fallback chain for an access level, most specific first
///
/// `User(id) → roles in assigned order → Default`, `Role → Default`,
/// `Visitor → Default`. Fails with `UnknownAccessLevel` when a role slug or
/// user id does not exist in the principal catalog: "not found", never
/// "denied".
pub fn fallback_chain(
    catalog: &dyn PrincipalCatalog,
    level: &AccessLevel,
) -> ResolveResult<Vec<AccessLevel>> {
    match level {
        AccessLevel::Default => Ok(vec![AccessLevel::Default]),
        AccessLevel::Visitor => Ok(vec![AccessLevel::Visitor, AccessLevel::Default]),
        AccessLevel::Role(slug) => {
            if !catalog.role_exists(slug) {
                return Err(ResolveError::unknown_level(level));
            }
            Ok(vec![level.clone(), AccessLevel::Default])
        }
        AccessLevel::User(id) => {
            let identity = catalog
                .user_identity(*id)
                .ok_or_else(|| ResolveError::unknown_level(level))?;

            let mut chain = Vec::with_capacity(identity.roles.len() + 2);
            chain.push(level.clone());
            for role in identity.roles {
                chain.push(AccessLevel::Role(role));
            }
            chain.push(AccessLevel::Default);
            Ok(chain)
        }
    }
}

/// Resolves effective permissions by merging the access-level hierarchy
///
/// Stateless between calls: each `resolve` reads the current store snapshot
/// and returns a pure function of it. Nothing is cached here; caching, if
/// any, is a collaborator's concern.
pub struct PermissionResolver {
    store: Arc<dyn PermissionStore>,
    catalog: Arc<dyn PrincipalCatalog>,
    extensions: Vec<Box<dyn PolicyExtension>>,
}

impl PermissionResolver {
    pub fn new(store: Arc<dyn PermissionStore>, catalog: Arc<dyn PrincipalCatalog>) -> Self {
        Self {
            store,
            catalog,
            extensions: Vec::new(),
        }
    }

    /// Register an extension consulted after each resolution, in order
    pub fn with_extension(mut self, extension: Box<dyn PolicyExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Build the fallback chain for an access level, most specific first
    pub fn fallback_chain(&self, level: &AccessLevel) -> ResolveResult<Vec<AccessLevel>> {
        fallback_chain(self.catalog.as_ref(), level)
    }

    /// Resolve the effective permission set for a subject and resource
    pub fn resolve(
        &self,
        level: &AccessLevel,
        resource: &ResourceRef,
    ) -> ResolveResult<EffectivePermission> {
        debug!(level = %level, resource = %resource, "Resolving effective permission");

        let chain = self.fallback_chain(level)?;

        // Overlay from tail (least specific) to head. A key present at a
        // more specific level replaces the inherited value; an absent key
        // leaves it untouched. Walking a user's roles in reverse order
        // means the earliest assigned role overlays last and wins ties.
        let mut merged = PermissionSet::new();
        let mut source_level = AccessLevel::Default;
        let mut is_customized = false;

        for link in chain.iter().rev() {
            let raw = self.store.get_raw(link, resource)?;
            if raw.is_empty() {
                continue;
            }
            trace!(link = %link, entries = raw.len(), "Overlaying raw permission set");

            source_level = link.clone();
            if link == level {
                is_customized = true;
            }
            for (key, permission) in raw {
                merged.insert(key, permission);
            }
        }

        let mut effective = EffectivePermission {
            permission_set: merged,
            is_customized,
            source_level,
        };

        for extension in &self.extensions {
            trace!(extension = extension.name(), "Consulting policy extension");
            extension.apply(level, resource, &mut effective);
        }

        Ok(effective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::permission::{Effect, Permission};
    use crate::principal::{PrincipalIdentity, StaticPrincipalCatalog};
    use crate::store::MemoryPermissionStore;

    fn put(
        store: &MemoryPermissionStore,
        level: AccessLevel,
        resource: &ResourceRef,
        entries: &[(&str, Permission)],
    ) {
        let set: PermissionSet = entries
            .iter()
            .map(|(k, p)| (k.to_string(), p.clone()))
            .collect();
        store.put_raw(&level, resource, set).unwrap();
    }

    fn editor_catalog() -> Arc<StaticPrincipalCatalog> {
        Arc::new(
            StaticPrincipalCatalog::new()
                .with_role("subscriber")
                .with_user(PrincipalIdentity::new(42, vec!["editor".into()], 7)),
        )
    }

    #[test]
    fn test_unconfigured_resource_is_empty() {
        let store = Arc::new(MemoryPermissionStore::new());
        let resolver = PermissionResolver::new(store, editor_catalog());

        let effective = resolver
            .resolve(&AccessLevel::User(42), &ResourceRef::post(7))
            .unwrap();

        assert!(!effective.is_configured());
        assert!(!effective.is_customized);
        assert_eq!(effective.source_level, AccessLevel::Default);
    }

    #[test]
    fn test_role_override_beats_default() {
        // Scenario A: Default denies read, editor role allows it
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(7);
        put(&store, AccessLevel::Default, &post, &[("read", Permission::deny())]);
        put(
            &store,
            AccessLevel::Role("editor".into()),
            &post,
            &[("read", Permission::allow())],
        );

        let resolver = PermissionResolver::new(store, editor_catalog());
        let effective = resolver.resolve(&AccessLevel::User(42), &post).unwrap();

        assert_eq!(effective.effect_of("read"), Some(Effect::Allow));
        assert!(!effective.is_customized);
        assert_eq!(effective.source_level, AccessLevel::Role("editor".into()));
    }

    #[test]
    fn test_user_override_beats_role_and_default() {
        // Scenario B: user-level deny on top of Scenario A
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(7);
        put(&store, AccessLevel::Default, &post, &[("read", Permission::deny())]);
        put(
            &store,
            AccessLevel::Role("editor".into()),
            &post,
            &[("read", Permission::allow())],
        );
        put(&store, AccessLevel::User(42), &post, &[("read", Permission::deny())]);

        let resolver = PermissionResolver::new(store, editor_catalog());
        let effective = resolver.resolve(&AccessLevel::User(42), &post).unwrap();

        assert_eq!(effective.effect_of("read"), Some(Effect::Deny));
        assert!(effective.is_customized);
        assert_eq!(effective.source_level, AccessLevel::User(42));
    }

    #[test]
    fn test_keys_absent_above_inherit_from_default() {
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(7);
        put(
            &store,
            AccessLevel::Default,
            &post,
            &[("comment", Permission::deny()), ("read", Permission::allow())],
        );
        put(
            &store,
            AccessLevel::User(42),
            &post,
            &[("read", Permission::deny())],
        );

        let resolver = PermissionResolver::new(store, editor_catalog());
        let effective = resolver.resolve(&AccessLevel::User(42), &post).unwrap();

        // "comment" configured only at Default survives the overlay
        assert_eq!(effective.effect_of("comment"), Some(Effect::Deny));
        assert_eq!(effective.effect_of("read"), Some(Effect::Deny));
    }

    #[test]
    fn test_earliest_assigned_role_wins_ties() {
        let catalog = Arc::new(StaticPrincipalCatalog::new().with_user(
            PrincipalIdentity::new(9, vec!["author".into(), "contributor".into()], 2),
        ));
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(3);
        put(
            &store,
            AccessLevel::Role("author".into()),
            &post,
            &[("edit", Permission::allow())],
        );
        put(
            &store,
            AccessLevel::Role("contributor".into()),
            &post,
            &[("edit", Permission::deny())],
        );

        let resolver = PermissionResolver::new(store, catalog);
        let effective = resolver.resolve(&AccessLevel::User(9), &post).unwrap();

        assert_eq!(effective.effect_of("edit"), Some(Effect::Allow));
    }

    #[test]
    fn test_visitor_falls_back_to_default_only() {
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(5);
        put(&store, AccessLevel::Default, &post, &[("read", Permission::deny())]);
        put(
            &store,
            AccessLevel::Role("editor".into()),
            &post,
            &[("read", Permission::allow())],
        );

        let resolver = PermissionResolver::new(store, editor_catalog());
        let effective = resolver.resolve(&AccessLevel::Visitor, &post).unwrap();

        // Role config is invisible to the visitor branch
        assert_eq!(effective.effect_of("read"), Some(Effect::Deny));
    }

    #[test]
    fn test_visitor_own_level_overrides_default() {
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(5);
        put(&store, AccessLevel::Default, &post, &[("read", Permission::allow())]);
        put(&store, AccessLevel::Visitor, &post, &[("read", Permission::deny())]);

        let resolver = PermissionResolver::new(store, editor_catalog());
        let effective = resolver.resolve(&AccessLevel::Visitor, &post).unwrap();

        assert_eq!(effective.effect_of("read"), Some(Effect::Deny));
        assert!(effective.is_customized);
    }

    #[test]
    fn test_user_with_no_roles_falls_back_to_default() {
        let catalog = Arc::new(
            StaticPrincipalCatalog::new().with_user(PrincipalIdentity::new(7, vec![], 0)),
        );
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(1);
        put(&store, AccessLevel::Default, &post, &[("read", Permission::deny())]);

        let resolver = PermissionResolver::new(store, catalog);
        let effective = resolver.resolve(&AccessLevel::User(7), &post).unwrap();

        assert_eq!(effective.effect_of("read"), Some(Effect::Deny));
        assert!(!effective.is_customized);
    }

    #[test]
    fn test_unknown_role_and_user_are_not_found() {
        let store = Arc::new(MemoryPermissionStore::new());
        let resolver = PermissionResolver::new(store, editor_catalog());

        let err = resolver
            .resolve(&AccessLevel::Role("ghost".into()), &ResourceRef::post(1))
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownAccessLevel { .. }));

        let err = resolver
            .resolve(&AccessLevel::User(999), &ResourceRef::post(1))
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownAccessLevel { .. }));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(7);
        put(&store, AccessLevel::Default, &post, &[("read", Permission::deny())]);
        put(
            &store,
            AccessLevel::User(42),
            &post,
            &[("edit", Permission::allow())],
        );

        let resolver = PermissionResolver::new(store, editor_catalog());
        let first = resolver.resolve(&AccessLevel::User(42), &post).unwrap();
        let second = resolver.resolve(&AccessLevel::User(42), &post).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_customized_flag_tracks_exact_level_only() {
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(7);
        put(
            &store,
            AccessLevel::Role("editor".into()),
            &post,
            &[("read", Permission::allow())],
        );

        let resolver = PermissionResolver::new(store, editor_catalog());

        // Ancestor configuration never sets the flag for the user
        let user_view = resolver.resolve(&AccessLevel::User(42), &post).unwrap();
        assert!(!user_view.is_customized);

        // The role itself sees its own configuration as a customization
        let role_view = resolver
            .resolve(&AccessLevel::Role("editor".into()), &post)
            .unwrap();
        assert!(role_view.is_customized);
    }

    struct ForceDeny(&'static str);

    impl PolicyExtension for ForceDeny {
        fn name(&self) -> &'static str {
            "force_deny"
        }

        fn apply(
            &self,
            _level: &AccessLevel,
            _resource: &ResourceRef,
            effective: &mut EffectivePermission,
        ) {
            effective
                .permission_set
                .insert(self.0.to_string(), Permission::deny());
        }
    }

    #[test]
    fn test_extensions_run_after_merge() {
        let store = Arc::new(MemoryPermissionStore::new());
        let post = ResourceRef::post(7);
        put(&store, AccessLevel::Default, &post, &[("read", Permission::allow())]);

        let resolver = PermissionResolver::new(store, editor_catalog())
            .with_extension(Box::new(ForceDeny("read")));

        let effective = resolver.resolve(&AccessLevel::User(42), &post).unwrap();
        assert_eq!(effective.effect_of("read"), Some(Effect::Deny));
    }
}
