//! Permission resolution module
//!
//! Implements the access-level hierarchy and the override-with-merge
//! algorithm producing an effective permission set per resource.
//!
//! ## Resolution model
//!
//! Raw permission sets live at four scopes. Resolution walks the fallback
//! chain for the requested scope and overlays sets key-by-key, most
//! specific scope winning:
//!
//! ```text
//! user → roles (assigned order) → default
//! role → default
//! visitor → default
//! ```
//!
//! A resource with no configuration anywhere resolves to an empty set; the
//! caller's policy default applies. The engine never invents an effect.

pub mod catalog;
pub mod permission;
pub mod resolver;
pub mod types;

pub use permission::{Effect, EffectivePermission, Permission, PermissionSet, Scalar};
pub use resolver::PermissionResolver;
pub use types::{AccessLevel, Identifier, ResourceRef, ResourceType};
