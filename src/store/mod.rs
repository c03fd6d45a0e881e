//! Storage collaborator traits
//!
//! The engine owns no persistence. These traits are the boundary contract:
//! implementations must guarantee per-key atomic read-modify-write and be
//! thread-safe. The in-memory implementations here back the CLI and tests.

mod memory;

pub use memory::{MemoryGovernanceStore, MemoryPermissionStore, MemoryRuleStore};

use crate::access::{AccessLevel, PermissionSet, ResourceRef};
use crate::error::StoreError;
use crate::governance::GovernanceRule;
use crate::redirect::{Feature, RedirectRule};

/// Raw permission storage keyed by `(AccessLevel, ResourceRef)`
///
/// `get_raw` returns an empty set when nothing is explicitly configured at
/// that level; that is a normal answer, not an error.
pub trait PermissionStore: Send + Sync {
    fn get_raw(
        &self,
        level: &AccessLevel,
        resource: &ResourceRef,
    ) -> Result<PermissionSet, StoreError>;

    fn put_raw(
        &self,
        level: &AccessLevel,
        resource: &ResourceRef,
        set: PermissionSet,
    ) -> Result<(), StoreError>;

    /// Remove the raw set for exactly this key; returns whether anything was
    /// actually removed
    fn delete_raw(&self, level: &AccessLevel, resource: &ResourceRef) -> Result<bool, StoreError>;
}

/// Redirect rule storage keyed by `(AccessLevel, Feature)`
pub trait RuleStore: Send + Sync {
    fn get(&self, level: &AccessLevel, feature: Feature)
    -> Result<Option<RedirectRule>, StoreError>;

    fn put(
        &self,
        level: &AccessLevel,
        feature: Feature,
        rule: RedirectRule,
    ) -> Result<(), StoreError>;

    fn remove(&self, level: &AccessLevel, feature: Feature) -> Result<bool, StoreError>;
}

/// Governance rule storage with store-assigned monotonic ids
pub trait GovernanceStore: Send + Sync {
    /// Persist a new rule; the store assigns the id and returns the stored
    /// rule
    fn insert(&self, rule: GovernanceRule) -> Result<GovernanceRule, StoreError>;

    fn get(&self, id: u64) -> Result<Option<GovernanceRule>, StoreError>;

    /// All rules in id order
    fn list(&self) -> Result<Vec<GovernanceRule>, StoreError>;

    /// Replace the rule with the given id; returns false if it never existed
    fn replace(&self, id: u64, rule: GovernanceRule) -> Result<bool, StoreError>;

    fn remove(&self, id: u64) -> Result<bool, StoreError>;
}
