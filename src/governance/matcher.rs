//! Identity governance matching
//!
//! Resolves the full configured rule set against a requesting principal and
//! computes the effective allow/deny per permission kind. Most specific
//! target wins; at equal specificity `Deny` beats `Allow`.

use crate::access::Effect;
use crate::error::{PolicyError, StoreError};
use crate::governance::rule::{GovernanceRule, GovernanceRulePatch, RuleType, TargetSpec};
use crate::principal::PrincipalIdentity;
use crate::store::GovernanceStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Specificity rank of a matched rule, higher wins
///
/// 1. `User` rule targeting the principal's id
/// 2. `Role` rule targeting a role the principal holds
/// 3. Level rule matching the principal's numeric level
/// 4. Any wildcard rule
fn match_specificity(rule: &GovernanceRule, principal: &PrincipalIdentity) -> Option<u8> {
    match (&rule.rule_type, &rule.target) {
        (RuleType::User, TargetSpec::Single(id)) => {
            (id.parse::<u64>() == Ok(principal.user_id)).then_some(4)
        }
        (RuleType::Role, TargetSpec::Single(slug)) => principal.has_role(slug).then_some(3),
        (RuleType::RoleLevel | RuleType::UserLevel, TargetSpec::Level(n)) => {
            (*n == principal.level).then_some(2)
        }
        (_, TargetSpec::Wildcard) => Some(1),
        _ => None,
    }
}

/// CRUD surface plus principal resolution over governance rules
pub struct IdentityGovernanceMatcher {
    store: Arc<dyn GovernanceStore>,
}

impl IdentityGovernanceMatcher {
    pub fn new(store: Arc<dyn GovernanceStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new rule; the store assigns the id
    pub fn create(&self, candidate: GovernanceRule) -> Result<GovernanceRule, PolicyError> {
        candidate.validate()?;
        let stored = self.store.insert(candidate)?;
        debug!(id = stored.id, rule_type = %stored.rule_type, "Created governance rule");
        Ok(stored)
    }

    /// All rules in id order
    pub fn list(&self) -> Result<Vec<GovernanceRule>, StoreError> {
        self.store.list()
    }

    pub fn get(&self, id: u64) -> Result<Option<GovernanceRule>, StoreError> {
        self.store.get(id)
    }

    /// Apply a partial update and re-validate the merged rule as a whole
    ///
    /// A failed validation leaves the stored rule untouched.
    pub fn update(
        &self,
        id: u64,
        patch: &GovernanceRulePatch,
    ) -> Result<GovernanceRule, PolicyError> {
        let existing = self
            .store
            .get(id)?
            .ok_or_else(|| PolicyError::NotFound(format!("governance rule {}", id)))?;

        let merged = patch.apply(&existing);
        merged.validate()?;

        if !self.store.replace(id, merged.clone())? {
            return Err(PolicyError::NotFound(format!("governance rule {}", id)));
        }
        Ok(merged)
    }

    /// Remove a rule; returns whether anything was actually removed
    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.store.remove(id)
    }

    /// Compute the effective effect per permission kind for a principal
    ///
    /// Every configured rule whose target matches contributes its effects;
    /// a higher-specificity match replaces a lower one per kind, and at
    /// equal specificity `Deny` wins (fail-closed).
    pub fn resolve_for_principal(
        &self,
        principal: &PrincipalIdentity,
    ) -> Result<BTreeMap<String, Effect>, StoreError> {
        let mut winners: BTreeMap<String, (u8, Effect)> = BTreeMap::new();

        for rule in self.store.list()? {
            let Some(specificity) = match_specificity(&rule, principal) else {
                continue;
            };
            trace!(id = rule.id, specificity, "Governance rule matches principal");

            for (kind, effect) in &rule.permissions {
                match winners.get(kind) {
                    Some((held, _)) if *held > specificity => {}
                    Some((held, held_effect)) if *held == specificity => {
                        if held_effect.is_allowed() && effect.is_denied() {
                            winners.insert(kind.clone(), (specificity, *effect));
                        }
                    }
                    _ => {
                        winners.insert(kind.clone(), (specificity, *effect));
                    }
                }
            }
        }

        Ok(winners
            .into_iter()
            .map(|(kind, (_, effect))| (kind, effect))
            .collect())
    }
}
