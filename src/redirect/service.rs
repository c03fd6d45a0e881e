//! Redirect rule service
//!
//! Read/write surface for per-feature redirect rules. Writes validate
//! first and only then persist, so a failed validation always leaves the
//! previously stored rule untouched.

use crate::access::AccessLevel;
use crate::access::resolver::fallback_chain;
use crate::error::{PolicyError, ResolveResult, StoreError};
use crate::principal::PrincipalCatalog;
use crate::redirect::rule::{Feature, RedirectRule};
use crate::redirect::status::FeatureTables;
use crate::redirect::validator::RuleValidator;
use crate::store::RuleStore;
use std::sync::Arc;
use tracing::{debug, trace};

/// Manages redirect rules for the four consuming features
///
/// One service instance covers all features; the per-feature status-code
/// tables are configuration data, not code.
pub struct RedirectService {
    store: Arc<dyn RuleStore>,
    catalog: Arc<dyn PrincipalCatalog>,
    validator: RuleValidator,
    tables: FeatureTables,
}

impl RedirectService {
    pub fn new(
        store: Arc<dyn RuleStore>,
        catalog: Arc<dyn PrincipalCatalog>,
        validator: RuleValidator,
        tables: FeatureTables,
    ) -> Self {
        Self {
            store,
            catalog,
            validator,
            tables,
        }
    }

    /// Read the rule configured at exactly this level, if any
    ///
    /// Idempotent, no side effects, no fallback walking.
    pub fn get(
        &self,
        level: &AccessLevel,
        feature: Feature,
    ) -> Result<Option<RedirectRule>, StoreError> {
        self.store.get(level, feature)
    }

    /// Validate a candidate and persist it for `(level, feature)`
    ///
    /// Returns the accepted (normalized) rule. Validation failures are
    /// returned before anything is written.
    pub fn set(
        &self,
        level: &AccessLevel,
        feature: Feature,
        candidate: RedirectRule,
    ) -> Result<RedirectRule, PolicyError> {
        let tables = self.tables.for_feature(feature);
        let accepted = self.validator.validate(&candidate, tables)?;

        debug!(
            level = %level,
            feature = %feature,
            variant = accepted.kind.variant_name(),
            "Storing redirect rule"
        );
        self.store.put(level, feature, accepted.clone())?;
        Ok(accepted)
    }

    /// Remove the rule configured at exactly this level
    ///
    /// Ancestor levels are untouched. Returns whether anything was
    /// actually removed.
    pub fn reset(&self, level: &AccessLevel, feature: Feature) -> Result<bool, StoreError> {
        self.store.remove(level, feature)
    }

    /// Find the nearest configured rule along the fallback chain
    ///
    /// Walks the same chain permission resolution uses and returns the
    /// first configured rule together with the level that supplied it, or
    /// `None` when no level in the chain configures one.
    pub fn effective(
        &self,
        level: &AccessLevel,
        feature: Feature,
    ) -> ResolveResult<Option<(RedirectRule, AccessLevel)>> {
        let chain = fallback_chain(self.catalog.as_ref(), level)?;
        for link in chain {
            if let Some(rule) = self.store.get(&link, feature)? {
                trace!(level = %link, feature = %feature, "Found redirect rule in chain");
                return Ok(Some((rule, link)));
            }
        }
        Ok(None)
    }
}
