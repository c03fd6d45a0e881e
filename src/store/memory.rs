//! In-memory store implementations
//!
//! Reference implementations of the storage traits. Each method takes a
//! single lock, giving the per-key atomicity the trait contract requires.

use crate::access::{AccessLevel, PermissionSet, ResourceRef};
use crate::error::StoreError;
use crate::governance::GovernanceRule;
use crate::redirect::{Feature, RedirectRule};
use crate::store::{GovernanceStore, PermissionStore, RuleStore};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

fn poisoned(_: impl std::fmt::Debug) -> StoreError {
    StoreError::Read("store lock poisoned".into())
}

/// In-memory permission store
#[derive(Debug, Default)]
pub struct MemoryPermissionStore {
    entries: RwLock<HashMap<(AccessLevel, ResourceRef), PermissionSet>>,
}

impl MemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PermissionStore for MemoryPermissionStore {
    fn get_raw(
        &self,
        level: &AccessLevel,
        resource: &ResourceRef,
    ) -> Result<PermissionSet, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .get(&(level.clone(), resource.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn put_raw(
        &self,
        level: &AccessLevel,
        resource: &ResourceRef,
        set: PermissionSet,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert((level.clone(), resource.clone()), set);
        Ok(())
    }

    fn delete_raw(&self, level: &AccessLevel, resource: &ResourceRef) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(entries.remove(&(level.clone(), resource.clone())).is_some())
    }
}

/// In-memory redirect rule store
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: RwLock<HashMap<(AccessLevel, Feature), RedirectRule>>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleStore for MemoryRuleStore {
    fn get(
        &self,
        level: &AccessLevel,
        feature: Feature,
    ) -> Result<Option<RedirectRule>, StoreError> {
        let rules = self.rules.read().map_err(poisoned)?;
        Ok(rules.get(&(level.clone(), feature)).cloned())
    }

    fn put(
        &self,
        level: &AccessLevel,
        feature: Feature,
        rule: RedirectRule,
    ) -> Result<(), StoreError> {
        let mut rules = self.rules.write().map_err(poisoned)?;
        rules.insert((level.clone(), feature), rule);
        Ok(())
    }

    fn remove(&self, level: &AccessLevel, feature: Feature) -> Result<bool, StoreError> {
        let mut rules = self.rules.write().map_err(poisoned)?;
        Ok(rules.remove(&(level.clone(), feature)).is_some())
    }
}

/// In-memory governance rule store with monotonic id assignment
#[derive(Debug, Default)]
pub struct MemoryGovernanceStore {
    inner: RwLock<GovernanceInner>,
}

#[derive(Debug, Default)]
struct GovernanceInner {
    next_id: u64,
    rules: BTreeMap<u64, GovernanceRule>,
}

impl MemoryGovernanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GovernanceStore for MemoryGovernanceStore {
    fn insert(&self, mut rule: GovernanceRule) -> Result<GovernanceRule, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.next_id += 1;
        rule.id = inner.next_id;
        inner.rules.insert(rule.id, rule.clone());
        Ok(rule)
    }

    fn get(&self, id: u64) -> Result<Option<GovernanceRule>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.rules.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<GovernanceRule>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.rules.values().cloned().collect())
    }

    fn replace(&self, id: u64, mut rule: GovernanceRule) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        if !inner.rules.contains_key(&id) {
            return Ok(false);
        }
        rule.id = id;
        inner.rules.insert(id, rule);
        Ok(true)
    }

    fn remove(&self, id: u64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        Ok(inner.rules.remove(&id).is_some())
    }
}
