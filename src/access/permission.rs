//! Permission values and effective permission sets
//!
//! A raw `PermissionSet` is what the store holds for one
//! `(AccessLevel, ResourceRef)` pair; an `EffectivePermission` is what the
//! resolver produces after walking the fallback chain.

use crate::access::types::AccessLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Allow or deny outcome for a single permission key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Effect::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Effect::Deny)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "allow",
            Effect::Deny => "deny",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scalar attribute value carried alongside an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

/// A single configured permission
///
/// Only `effect` participates in merge precedence; `attributes` ride along
/// wholesale from whichever level supplied the winning effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub effect: Effect,

    /// Type-specific extras (e.g. `is_top_level` for menu items)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Scalar>,
}

impl Permission {
    pub fn allow() -> Self {
        Self {
            effect: Effect::Allow,
            attributes: BTreeMap::new(),
        }
    }

    pub fn deny() -> Self {
        Self {
            effect: Effect::Deny,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Raw permission map for a single `(AccessLevel, ResourceRef)` pair
///
/// Empty when nothing is explicitly configured at that level.
pub type PermissionSet = BTreeMap<String, Permission>;

/// Resolver output: the merged permission set plus provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectivePermission {
    /// Merged key-by-key result of the fallback chain
    pub permission_set: PermissionSet,

    /// True iff the exact access level under resolution (not an ancestor)
    /// has at least one explicit entry in the store
    pub is_customized: bool,

    /// Most specific level in the chain that contributed an explicit entry;
    /// `Default` when nothing is configured anywhere
    pub source_level: AccessLevel,
}

impl EffectivePermission {
    /// Whether anything in the chain configured this resource at all
    ///
    /// When false the caller's policy default (typically allow) applies;
    /// the engine does not invent a default effect.
    pub fn is_configured(&self) -> bool {
        !self.permission_set.is_empty()
    }

    /// Effect for a single permission key, if configured
    pub fn effect_of(&self, key: &str) -> Option<Effect> {
        self.permission_set.get(key).map(|p| p.effect)
    }

    /// Convenience check: is the given permission key explicitly denied
    pub fn is_denied(&self, key: &str) -> bool {
        self.effect_of(key) == Some(Effect::Deny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_serde() {
        assert_eq!(serde_json::to_string(&Effect::Allow).unwrap(), r#""allow""#);
        let e: Effect = serde_json::from_str(r#""deny""#).unwrap();
        assert_eq!(e, Effect::Deny);
    }

    #[test]
    fn test_scalar_untagged_serde() {
        let s: Scalar = serde_json::from_str("true").unwrap();
        assert_eq!(s, Scalar::Bool(true));
        let s: Scalar = serde_json::from_str("7").unwrap();
        assert_eq!(s, Scalar::Int(7));
        let s: Scalar = serde_json::from_str(r#""top""#).unwrap();
        assert_eq!(s, Scalar::Str("top".into()));
    }

    #[test]
    fn test_permission_builder() {
        let p = Permission::deny().with_attribute("is_top_level", true);
        assert_eq!(p.effect, Effect::Deny);
        assert_eq!(p.attributes.get("is_top_level"), Some(&Scalar::Bool(true)));
    }

    #[test]
    fn test_effective_permission_helpers() {
        let mut set = PermissionSet::new();
        set.insert("read".into(), Permission::deny());

        let effective = EffectivePermission {
            permission_set: set,
            is_customized: false,
            source_level: AccessLevel::Default,
        };

        assert!(effective.is_configured());
        assert_eq!(effective.effect_of("read"), Some(Effect::Deny));
        assert!(effective.is_denied("read"));
        assert_eq!(effective.effect_of("edit"), None);
        assert!(!effective.is_denied("edit"));
    }
}
