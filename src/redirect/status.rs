//! Status-code range tables
//!
//! Legal HTTP status codes per rule variant are configured as two-digit
//! "family" tokens (`"3xx"`, `"4xx"`, `"5xx"`). Tokens are parsed once at
//! configuration-load time into closed integer intervals; validating a code
//! is then an inclusive range check against the union.

use crate::error::ConfigError;
use crate::redirect::rule::{Feature, RedirectKind};
use std::collections::HashMap;
use std::fmt;

/// A single `Nxx` family, expanded to the interval `[100*N, 100*N + 99]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFamily(u16);

impl StatusFamily {
    /// Parse a family token of the form `"3xx"`
    pub fn parse(token: &str) -> Result<Self, ConfigError> {
        let bytes = token.as_bytes();
        if bytes.len() != 3 || &bytes[1..] != b"xx" {
            return Err(ConfigError::InvalidStatusFamily {
                token: token.to_string(),
                reason: "expected a token of the form '3xx'".into(),
            });
        }
        let hundreds = (bytes[0] as char).to_digit(10).ok_or_else(|| {
            ConfigError::InvalidStatusFamily {
                token: token.to_string(),
                reason: "family digit must be numeric".into(),
            }
        })?;
        if !(1..=5).contains(&hundreds) {
            return Err(ConfigError::InvalidStatusFamily {
                token: token.to_string(),
                reason: "family digit must be between 1 and 5".into(),
            });
        }
        Ok(Self(hundreds as u16))
    }

    /// Closed interval covered by this family
    pub fn interval(&self) -> (u16, u16) {
        (self.0 * 100, self.0 * 100 + 99)
    }
}

impl fmt::Display for StatusFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}xx", self.0)
    }
}

/// Union of expanded family intervals for one rule variant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCodeTable {
    families: Vec<StatusFamily>,
}

impl StatusCodeTable {
    /// Build a table from family tokens, rejecting malformed ones
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ConfigError> {
        let families = tokens
            .iter()
            .map(|t| StatusFamily::parse(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { families })
    }

    /// Table accepting no status codes at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Inclusive membership check against the union of intervals
    pub fn contains(&self, code: u16) -> bool {
        self.families.iter().any(|family| {
            let (lo, hi) = family.interval();
            (lo..=hi).contains(&code)
        })
    }

    /// Human-readable description for error messages, e.g. `"3xx, 4xx"`
    pub fn describe(&self) -> String {
        self.families
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Status-code tables for every rule variant of one feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantTables {
    pub default: StatusCodeTable,
    pub page_redirect: StatusCodeTable,
    pub url_redirect: StatusCodeTable,
    pub trigger_callback: StatusCodeTable,
    pub custom_message: StatusCodeTable,
}

impl VariantTables {
    /// Table applying to the given rule variant
    pub fn for_kind(&self, kind: &RedirectKind) -> &StatusCodeTable {
        match kind {
            RedirectKind::Default => &self.default,
            RedirectKind::PageRedirect { .. } => &self.page_redirect,
            RedirectKind::UrlRedirect { .. } => &self.url_redirect,
            RedirectKind::TriggerCallback { .. } => &self.trigger_callback,
            RedirectKind::CustomMessage { .. } => &self.custom_message,
        }
    }
}

impl Default for VariantTables {
    fn default() -> Self {
        // Infallible: every token below is well-formed
        let table = |tokens: &[&str]| {
            StatusCodeTable::from_tokens(tokens).unwrap_or_else(|_| StatusCodeTable::empty())
        };
        Self {
            default: table(&["4xx", "5xx"]),
            page_redirect: table(&["3xx"]),
            url_redirect: table(&["3xx"]),
            trigger_callback: table(&["3xx", "4xx", "5xx"]),
            custom_message: table(&["4xx", "5xx"]),
        }
    }
}

/// Per-feature variant tables
///
/// The validator is parameterized by whichever feature's tables apply; it
/// is never hard-coded to one feature.
#[derive(Debug, Clone, Default)]
pub struct FeatureTables {
    overrides: HashMap<Feature, VariantTables>,
    fallback: VariantTables,
}

impl FeatureTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tables for one feature
    pub fn with_feature(mut self, feature: Feature, tables: VariantTables) -> Self {
        self.overrides.insert(feature, tables);
        self
    }

    /// Tables for a feature, falling back to the built-in defaults
    pub fn for_feature(&self, feature: Feature) -> &VariantTables {
        self.overrides.get(&feature).unwrap_or(&self.fallback)
    }
}
