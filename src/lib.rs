//! Access-control policy resolution engine
//!
//! A pure computation library that decides, for a principal (visitor,
//! authenticated user, or role) and a protected resource (content item,
//! content type, taxonomy term, menu entry, metabox/widget, API route, URL
//! pattern, or capability), what permission applies and, when the outcome
//! is deny, how the request should be redirected or answered.
//!
//! ## Resolution model
//!
//! ```text
//! default → role(s) → user        (visitor falls back to default only)
//! ```
//!
//! Raw permission sets are merged key-by-key along the fallback chain, the
//! most specific level winning. An unconfigured resource resolves to an
//! empty set; the caller's policy default applies.
//!
//! ## Redirect rules
//!
//! Denial handling is a tagged rule (`default`, `page_redirect`,
//! `url_redirect`, `trigger_callback`, `custom_message`) shared by the
//! access-denied, logout, 404, and URL-access features. Each variant
//! carries an optional HTTP status code checked against per-feature family
//! tables (`"3xx"`-style tokens expanded once at configuration load).
//!
//! ## Identity governance
//!
//! Targeted allow/deny rules over identity attributes, resolved by target
//! specificity (user id > held role > numeric level > wildcard) with a
//! fail-closed deny tie-break.
//!
//! The engine performs no I/O: persistence, principal/page catalogs, and
//! callback resolution are collaborator traits, and every public operation
//! returns a typed `Result`.

pub mod access;
pub mod config;
pub mod engine;
pub mod error;
pub mod extension;
pub mod governance;
pub mod principal;
pub mod redirect;
pub mod store;

// Re-export main types
pub use access::{
    AccessLevel, Effect, EffectivePermission, Permission, PermissionResolver, PermissionSet,
    ResourceRef, ResourceType, Scalar,
};
pub use config::{AppConfig, load_config, load_config_from_str};
pub use engine::{Engine, EngineDeps};
pub use error::{PolicyError, ResolveError, Result, StoreError, ValidationError};
pub use extension::PolicyExtension;
pub use governance::{GovernanceRule, GovernanceRulePatch, IdentityGovernanceMatcher};
pub use principal::{PrincipalCatalog, PrincipalIdentity};
pub use redirect::{Feature, RedirectKind, RedirectRule, RedirectService, RuleValidator};
