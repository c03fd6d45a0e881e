//! Configuration types for warden
//!
//! Configuration comes in two parts: engine settings (logging, per-feature
//! status-code tables) and an optional policy section describing the
//! permissions, redirect rules, and governance rules the in-memory stores
//! are seeded with. Both load from TOML and/or environment variables.

use crate::access::{AccessLevel, PermissionSet, ResourceRef};
use crate::error::ConfigError;
use crate::governance::GovernanceRule;
use crate::principal::PrincipalIdentity;
use crate::redirect::{Feature, FeatureTables, RedirectRule, StatusCodeTable, VariantTables};
use serde::Deserialize;
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Per-feature status-code table overrides, keyed by feature name
    pub features: HashMap<String, VariantTablesConfig>,

    /// Policy data the in-memory stores are seeded with
    pub policy: PolicyConfig,
}

impl AppConfig {
    /// Compile the configured family tokens into interval tables
    ///
    /// Tokens are parsed here, once, at configuration-load time; rule
    /// validation afterwards is a pure range check.
    pub fn feature_tables(&self) -> Result<FeatureTables, ConfigError> {
        let mut tables = FeatureTables::new();
        for (name, config) in &self.features {
            let feature = Feature::try_parse(name).ok_or_else(|| ConfigError::Invalid {
                message: format!("unknown feature '{}'", name),
            })?;
            tables = tables.with_feature(feature, config.compile()?);
        }
        Ok(tables)
    }
}

/// Status-code family tokens for each rule variant of one feature
///
/// Absent variants keep their default table; an explicitly empty list
/// means "no codes accepted" for that variant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariantTablesConfig {
    pub default: Option<Vec<String>>,
    pub page_redirect: Option<Vec<String>>,
    pub url_redirect: Option<Vec<String>>,
    pub trigger_callback: Option<Vec<String>>,
    pub custom_message: Option<Vec<String>>,
}

impl VariantTablesConfig {
    pub fn compile(&self) -> Result<VariantTables, ConfigError> {
        let defaults = VariantTables::default();
        let compile = |tokens: &Option<Vec<String>>, fallback: &StatusCodeTable| match tokens {
            Some(tokens) => StatusCodeTable::from_tokens(tokens),
            None => Ok(fallback.clone()),
        };
        Ok(VariantTables {
            default: compile(&self.default, &defaults.default)?,
            page_redirect: compile(&self.page_redirect, &defaults.page_redirect)?,
            url_redirect: compile(&self.url_redirect, &defaults.url_redirect)?,
            trigger_callback: compile(&self.trigger_callback, &defaults.trigger_callback)?,
            custom_message: compile(&self.custom_message, &defaults.custom_message)?,
        })
    }
}

/// Seed data for the in-memory stores and static catalogs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Role slugs known to the principal catalog
    pub roles: Vec<String>,

    /// Users known to the principal catalog
    pub users: Vec<PrincipalIdentity>,

    /// Page ids that exist in the page catalog
    pub pages: Vec<u64>,

    /// Callable references registered in the callback registry
    pub callbacks: Vec<String>,

    /// Raw permission sets per `(level, resource)`
    pub permissions: Vec<PermissionEntry>,

    /// Redirect rules per `(level, feature)`
    pub redirects: Vec<RedirectEntry>,

    /// Governance rules (ids are assigned at load time)
    pub governance: Vec<GovernanceRule>,
}

/// One configured raw permission set
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionEntry {
    pub level: AccessLevel,
    pub resource: ResourceRef,
    pub set: PermissionSet,
}

/// One configured redirect rule
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectEntry {
    pub level: AccessLevel,
    pub feature: Feature,
    pub rule: RedirectRule,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
