//! Principal catalog collaborator
//!
//! The host platform owns users and roles; the engine only needs existence
//! checks and role membership to build fallback chains and match governance
//! targets. "Not found" is always distinct from "found but empty".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity attributes of a concrete user, as resolved by the host platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalIdentity {
    /// User id
    pub user_id: u64,

    /// Role slugs in the user's assigned order; may be empty
    #[serde(default)]
    pub roles: Vec<String>,

    /// Numeric capability level
    #[serde(default)]
    pub level: i32,
}

impl PrincipalIdentity {
    pub fn new(user_id: u64, roles: Vec<String>, level: i32) -> Self {
        Self {
            user_id,
            roles,
            level,
        }
    }

    pub fn has_role(&self, slug: &str) -> bool {
        self.roles.iter().any(|r| r == slug)
    }
}

/// Resolves role slugs and user ids into existence and identity attributes
///
/// Implementations must be thread-safe; the engine calls them synchronously
/// during resolution and holds no state between calls.
pub trait PrincipalCatalog: Send + Sync {
    /// Whether a role with this slug exists
    fn role_exists(&self, slug: &str) -> bool;

    /// Look up a user's identity; `None` means the user does not exist,
    /// which is different from a user with no roles
    fn user_identity(&self, user_id: u64) -> Option<PrincipalIdentity>;
}

/// In-memory catalog for tests and the CLI policy loader
#[derive(Debug, Default)]
pub struct StaticPrincipalCatalog {
    roles: Vec<String>,
    users: HashMap<u64, PrincipalIdentity>,
}

impl StaticPrincipalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, slug: impl Into<String>) -> Self {
        self.roles.push(slug.into());
        self
    }

    pub fn with_user(mut self, identity: PrincipalIdentity) -> Self {
        // Roles referenced by the user are registered implicitly
        for role in &identity.roles {
            if !self.roles.contains(role) {
                self.roles.push(role.clone());
            }
        }
        self.users.insert(identity.user_id, identity);
        self
    }
}

impl PrincipalCatalog for StaticPrincipalCatalog {
    fn role_exists(&self, slug: &str) -> bool {
        self.roles.iter().any(|r| r == slug)
    }

    fn user_identity(&self, user_id: u64) -> Option<PrincipalIdentity> {
        self.users.get(&user_id).cloned()
    }
}
