//! Typed policy extension points
//!
//! Outside code can influence a resolution outcome through an explicit list
//! of trait objects the resolver consults after computing its own result,
//! in registration order. This replaces ambient global dispatch with a
//! typed, inspectable seam.

use crate::access::{AccessLevel, EffectivePermission, ResourceRef};

/// Hook consulted after the resolver has computed an effective permission
///
/// Implementations may tighten, loosen, or annotate the result in place.
/// They must not perform blocking I/O; the engine calls them synchronously
/// inside `resolve`.
pub trait PolicyExtension: Send + Sync {
    /// Name used in trace logging
    fn name(&self) -> &'static str;

    /// Adjust the effective permission for the given subject and resource
    fn apply(
        &self,
        level: &AccessLevel,
        resource: &ResourceRef,
        effective: &mut EffectivePermission,
    );
}
