//! Identity governance rule types
//!
//! A governance rule assigns allow/deny effects over user/role identity
//! attributes, independent of resource-level permissions. The target shape
//! must match the rule type; the variant-aware validation here mirrors the
//! redirect rule validator's "selected tag determines required fields"
//! pattern.

use crate::access::Effect;
use crate::access::catalog::is_legal_governance_kind;
use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity attribute a rule targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// A single user by id
    User,
    /// Everyone holding a role
    Role,
    /// Roles at a numeric capability level
    RoleLevel,
    /// Users at a numeric capability level
    UserLevel,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::User => "user",
            RuleType::Role => "role",
            RuleType::RoleLevel => "role_level",
            RuleType::UserLevel => "user_level",
        }
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(RuleType::User),
            "role" => Some(RuleType::Role),
            "role_level" => Some(RuleType::RoleLevel),
            "user_level" => Some(RuleType::UserLevel),
            _ => None,
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a rule matches against: everything, one identifier, or one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpec {
    /// All users / all roles / all levels
    Wildcard,
    /// One user id (as a string) or role slug
    Single(String),
    /// One numeric capability level
    Level(i32),
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSpec::Wildcard => write!(f, "*"),
            TargetSpec::Single(s) => write!(f, "{}", s),
            TargetSpec::Level(n) => write!(f, "level:{}", n),
        }
    }
}

/// A targeted allow/deny assignment over identity attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceRule {
    /// Store-assigned id; 0 until persisted
    #[serde(default)]
    pub id: u64,

    pub rule_type: RuleType,

    pub target: TargetSpec,

    /// Effects per governance permission kind
    #[serde(default)]
    pub permissions: BTreeMap<String, Effect>,
}

impl GovernanceRule {
    pub fn new(
        rule_type: RuleType,
        target: TargetSpec,
        permissions: Vec<(String, Effect)>,
    ) -> Self {
        Self {
            id: 0,
            rule_type,
            target,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Validate the target shape against the rule type and every
    /// permission kind against the governance catalog
    ///
    /// Fail-fast: the first violation wins.
    pub fn validate(&self) -> ValidationResult<()> {
        match (self.rule_type, &self.target) {
            (_, TargetSpec::Wildcard) => {}
            (RuleType::User, TargetSpec::Single(id)) => {
                if id.parse::<u64>().is_err() {
                    return Err(ValidationError::new(
                        "target",
                        format!("user target '{}' is not a numeric id", id),
                    ));
                }
            }
            (RuleType::Role, TargetSpec::Single(slug)) => {
                if slug.trim().is_empty() {
                    return Err(ValidationError::new("target", "role target slug is empty"));
                }
            }
            (RuleType::RoleLevel | RuleType::UserLevel, TargetSpec::Level(_)) => {}
            (rule_type, target) => {
                return Err(ValidationError::new(
                    "target",
                    format!(
                        "target shape '{}' does not match rule type '{}'",
                        target, rule_type
                    ),
                ));
            }
        }

        for kind in self.permissions.keys() {
            if !is_legal_governance_kind(kind) {
                return Err(ValidationError::new(
                    "permissions",
                    format!("unknown governance permission kind '{}'", kind),
                ));
            }
        }

        Ok(())
    }
}

/// Partial update applied to a stored rule
///
/// Absent fields leave the stored value untouched; the merged rule is
/// re-validated as a whole before it replaces the original.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GovernanceRulePatch {
    pub rule_type: Option<RuleType>,
    pub target: Option<TargetSpec>,
    pub permissions: Option<BTreeMap<String, Effect>>,
}

impl GovernanceRulePatch {
    /// Merge this patch over an existing rule, keeping its id
    pub fn apply(&self, rule: &GovernanceRule) -> GovernanceRule {
        GovernanceRule {
            id: rule.id,
            rule_type: self.rule_type.unwrap_or(rule.rule_type),
            target: self.target.clone().unwrap_or_else(|| rule.target.clone()),
            permissions: self
                .permissions
                .clone()
                .unwrap_or_else(|| rule.permissions.clone()),
        }
    }
}
