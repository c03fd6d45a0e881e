//! Identity governance module
//!
//! Targeted allow/deny rules over user and role identity attributes. The
//! matcher picks the most specific matching rule per permission kind:
//!
//! ```text
//! user id > held role > numeric level > wildcard
//! ```
//!
//! Conflicts at equal specificity resolve to deny.

pub mod matcher;
pub mod rule;

pub use matcher::IdentityGovernanceMatcher;
pub use rule::{GovernanceRule, GovernanceRulePatch, RuleType, TargetSpec};
