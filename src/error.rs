//! Error types for warden
//!
//! This module defines the error hierarchy used throughout the engine.
//! We use `thiserror` for library-style errors that are part of the API;
//! transport layers convert them to protocol-appropriate envelopes at the
//! boundary. Denial is never an error: `Effect::Deny` is a normal result.

use thiserror::Error;

/// Top-level policy engine error
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid status family '{token}': {reason}")]
    InvalidStatusFamily { token: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while resolving an effective permission
///
/// `UnknownAccessLevel` signals "not found": a role slug or user id that
/// does not exist in the principal catalog. It must never be conflated with
/// a legitimate `Deny` outcome, which is a successful resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Unknown access level '{level}'")]
    UnknownAccessLevel { level: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ResolveError {
    pub fn unknown_level(level: impl std::fmt::Display) -> Self {
        ResolveError::UnknownAccessLevel {
            level: level.to_string(),
        }
    }
}

/// A candidate rule failed its variant contract
///
/// Carries the offending field name and a human-readable reason. Validation
/// is fail-fast: the first failing field wins, failures are not aggregated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid field '{field}': {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: "required field is missing".into(),
        }
    }

    pub fn status_out_of_range(code: u16, accepted: impl Into<String>) -> Self {
        Self {
            field: "http_status_code".into(),
            reason: format!(
                "status code {} is outside the accepted ranges ({})",
                code,
                accepted.into()
            ),
        }
    }

    pub fn status_not_accepted(code: u16) -> Self {
        Self {
            field: "http_status_code".into(),
            reason: format!(
                "status code {} supplied but this variant accepts no status codes",
                code
            ),
        }
    }
}

/// The backing store could not complete a read or write
///
/// Treated as fatal for the current call; the engine never retries
/// internally. Retry policy, if any, belongs to the transport layer or the
/// store collaborator itself.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store read failed: {0}")]
    Read(String),

    #[error("Store write failed: {0}")]
    Write(String),
}

/// Result type alias for the engine
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Result type alias for resolution operations
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
