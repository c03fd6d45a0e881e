//! Engine facade
//!
//! Bundles the resolver, redirect service, and governance matcher behind
//! one constructor so transport layers wire up the collaborators once. The
//! engine itself stays request-scoped and stateless between calls.

use crate::access::catalog::validate_set;
use crate::access::{AccessLevel, PermissionResolver, PermissionSet, ResourceRef};
use crate::config::PolicyConfig;
use crate::error::PolicyError;
use crate::governance::IdentityGovernanceMatcher;
use crate::principal::{PrincipalCatalog, StaticPrincipalCatalog};
use crate::redirect::{
    CallbackRegistry, FeatureTables, PageCatalog, RedirectService, RuleValidator,
    StaticCallbackRegistry, StaticPageCatalog,
};
use crate::store::{
    GovernanceStore, MemoryGovernanceStore, MemoryPermissionStore, MemoryRuleStore,
    PermissionStore, RuleStore,
};
use std::sync::Arc;
use tracing::info;

/// Storage and host-platform collaborators the engine is built from
pub struct EngineDeps {
    pub permissions: Arc<dyn PermissionStore>,
    pub rules: Arc<dyn RuleStore>,
    pub governance: Arc<dyn GovernanceStore>,
    pub principals: Arc<dyn PrincipalCatalog>,
    pub pages: Arc<dyn PageCatalog>,
    pub callbacks: Arc<dyn CallbackRegistry>,
}

/// Policy engine: resolution, redirect rules, and identity governance
pub struct Engine {
    permissions: Arc<dyn PermissionStore>,
    resolver: PermissionResolver,
    redirects: RedirectService,
    governance: IdentityGovernanceMatcher,
}

impl Engine {
    /// Wire up an engine from its collaborators and per-feature tables
    pub fn new(deps: EngineDeps, tables: FeatureTables) -> Self {
        let resolver = PermissionResolver::new(deps.permissions.clone(), deps.principals.clone());
        let validator = RuleValidator::new(deps.pages, deps.callbacks);
        let redirects = RedirectService::new(deps.rules, deps.principals, validator, tables);
        let governance = IdentityGovernanceMatcher::new(deps.governance);

        info!("Initialized policy engine");

        Self {
            permissions: deps.permissions,
            resolver,
            redirects,
            governance,
        }
    }

    /// Build an engine over in-memory stores seeded from a policy config
    ///
    /// Every entry goes through the same validated write paths a transport
    /// layer would use, so a malformed policy file fails loudly at load
    /// time.
    pub fn from_policy(policy: &PolicyConfig, tables: FeatureTables) -> Result<Self, PolicyError> {
        let mut principals = StaticPrincipalCatalog::new();
        for role in &policy.roles {
            principals = principals.with_role(role.clone());
        }
        for user in &policy.users {
            principals = principals.with_user(user.clone());
        }

        let mut pages = StaticPageCatalog::new();
        for page_id in &policy.pages {
            pages = pages.with_page(*page_id);
        }

        let mut callbacks = StaticCallbackRegistry::new();
        for reference in &policy.callbacks {
            callbacks = callbacks.with_callable(reference.clone());
        }

        let engine = Engine::new(
            EngineDeps {
                permissions: Arc::new(MemoryPermissionStore::new()),
                rules: Arc::new(MemoryRuleStore::new()),
                governance: Arc::new(MemoryGovernanceStore::new()),
                principals: Arc::new(principals),
                pages: Arc::new(pages),
                callbacks: Arc::new(callbacks),
            },
            tables,
        );

        for entry in &policy.permissions {
            engine.put_permissions(&entry.level, &entry.resource, entry.set.clone())?;
        }
        for entry in &policy.redirects {
            engine
                .redirects
                .set(&entry.level, entry.feature, entry.rule.clone())?;
        }
        for rule in &policy.governance {
            engine.governance.create(rule.clone())?;
        }

        Ok(engine)
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    pub fn redirects(&self) -> &RedirectService {
        &self.redirects
    }

    pub fn governance(&self) -> &IdentityGovernanceMatcher {
        &self.governance
    }

    /// Store a raw permission set after checking every key against the
    /// permission-kind catalog for the resource type
    pub fn put_permissions(
        &self,
        level: &AccessLevel,
        resource: &ResourceRef,
        set: PermissionSet,
    ) -> Result<(), PolicyError> {
        validate_set(resource.resource_type, &set)?;
        self.permissions.put_raw(level, resource, set)?;
        Ok(())
    }

    /// Remove the raw set at exactly this level; ancestors are untouched
    pub fn delete_permissions(
        &self,
        level: &AccessLevel,
        resource: &ResourceRef,
    ) -> Result<bool, PolicyError> {
        Ok(self.permissions.delete_raw(level, resource)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Permission;
    use crate::principal::{PrincipalIdentity, StaticPrincipalCatalog};
    use crate::redirect::{StaticCallbackRegistry, StaticPageCatalog};
    use crate::store::{MemoryGovernanceStore, MemoryPermissionStore, MemoryRuleStore};

    fn engine() -> Engine {
        let deps = EngineDeps {
            permissions: Arc::new(MemoryPermissionStore::new()),
            rules: Arc::new(MemoryRuleStore::new()),
            governance: Arc::new(MemoryGovernanceStore::new()),
            principals: Arc::new(
                StaticPrincipalCatalog::new()
                    .with_user(PrincipalIdentity::new(42, vec!["editor".into()], 7)),
            ),
            pages: Arc::new(StaticPageCatalog::new().with_page(12)),
            callbacks: Arc::new(StaticCallbackRegistry::new()),
        };
        Engine::new(deps, FeatureTables::new())
    }

    #[test]
    fn test_put_permissions_checks_the_catalog() {
        let engine = engine();
        let level = AccessLevel::Default;
        let post = ResourceRef::post(7);

        let mut bogus = PermissionSet::new();
        bogus.insert("launch_rockets".into(), Permission::deny());
        let err = engine.put_permissions(&level, &post, bogus).unwrap_err();
        assert!(matches!(err, PolicyError::Validation(_)));

        let mut set = PermissionSet::new();
        set.insert("read".into(), Permission::deny());
        engine.put_permissions(&level, &post, set).unwrap();

        let effective = engine
            .resolver()
            .resolve(&AccessLevel::User(42), &post)
            .unwrap();
        assert!(effective.is_denied("read"));

        assert!(engine.delete_permissions(&level, &post).unwrap());
        assert!(!engine.delete_permissions(&level, &post).unwrap());
    }
}
