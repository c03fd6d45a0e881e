//! Redirect rule types
//!
//! A redirect rule describes what happens when a request is denied: serve
//! the platform default response, redirect to a page or URL, invoke a
//! callback, or render a custom message. The same variant set is shared by
//! every consuming feature; only the status-code tables differ.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Consuming feature a redirect rule is configured for
///
/// Each feature carries its own status-code table set and namespaces its
/// rule storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// "Access denied" handling for protected content
    AccessDenied,
    /// Post-logout destination
    Logout,
    /// Not-found (404) handling
    NotFound,
    /// URL-access rule denials
    UrlAccess,
}

impl Feature {
    /// Get the feature name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::AccessDenied => "access_denied",
            Feature::Logout => "logout",
            Feature::NotFound => "not_found",
            Feature::UrlAccess => "url_access",
        }
    }

    /// Try to parse a feature from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "access_denied" => Some(Feature::AccessDenied),
            "logout" => Some(Feature::Logout),
            "not_found" => Some(Feature::NotFound),
            "url_access" => Some(Feature::UrlAccess),
            _ => None,
        }
    }

    /// Get all features
    pub fn all() -> &'static [Feature] {
        &[
            Feature::AccessDenied,
            Feature::Logout,
            Feature::NotFound,
            Feature::UrlAccess,
        ]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Denial-handling behavior, selected by the `type` tag
///
/// Fields irrelevant to the selected variant are rejected by serde;
/// fields required by it are validated by `RuleValidator` before a rule is
/// accepted into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RedirectKind {
    /// Platform default denial response
    Default,
    /// Redirect to an existing page
    PageRedirect { page_id: u64 },
    /// Redirect to an absolute or root-relative URL
    UrlRedirect { url: String },
    /// Invoke a registered callback
    TriggerCallback { callback: String },
    /// Render a custom message
    CustomMessage { message: String },
}

impl RedirectKind {
    /// Variant name matching the serde tag, used in table lookups and
    /// error messages
    pub fn variant_name(&self) -> &'static str {
        match self {
            RedirectKind::Default => "default",
            RedirectKind::PageRedirect { .. } => "page_redirect",
            RedirectKind::UrlRedirect { .. } => "url_redirect",
            RedirectKind::TriggerCallback { .. } => "trigger_callback",
            RedirectKind::CustomMessage { .. } => "custom_message",
        }
    }
}

/// A denial-handling rule: the selected behavior plus an optional HTTP
/// status code whose legal range depends on the variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectRule {
    #[serde(flatten)]
    pub kind: RedirectKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,
}

impl RedirectRule {
    pub fn new(kind: RedirectKind) -> Self {
        Self {
            kind,
            http_status_code: None,
        }
    }

    pub fn default_rule() -> Self {
        Self::new(RedirectKind::Default)
    }

    pub fn page(page_id: u64) -> Self {
        Self::new(RedirectKind::PageRedirect { page_id })
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::new(RedirectKind::UrlRedirect { url: url.into() })
    }

    pub fn callback(callback: impl Into<String>) -> Self {
        Self::new(RedirectKind::TriggerCallback {
            callback: callback.into(),
        })
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(RedirectKind::CustomMessage {
            message: message.into(),
        })
    }

    pub fn with_status(mut self, code: u16) -> Self {
        self.http_status_code = Some(code);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_roundtrip() {
        for feature in Feature::all() {
            assert_eq!(Feature::try_parse(feature.as_str()), Some(*feature));
        }
        assert!(Feature::try_parse("login").is_none());
    }

    #[test]
    fn test_rule_serde_tagged_form() {
        let rule = RedirectRule::page(12).with_status(302);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "page_redirect");
        assert_eq!(json["page_id"], 12);
        assert_eq!(json["http_status_code"], 302);

        let back: RedirectRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_rule_serde_omits_absent_status() {
        let rule = RedirectRule::default_rule();
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "default");
        assert!(json.get("http_status_code").is_none());
    }

    #[test]
    fn test_rule_toml_form() {
        let rule: RedirectRule = toml::from_str(
            r#"
type = "url_redirect"
url = "/login"
http_status_code = 302
"#,
        )
        .unwrap();
        assert_eq!(rule, RedirectRule::url("/login").with_status(302));
    }

    #[test]
    fn test_variant_names_match_serde_tags() {
        let kinds = [
            RedirectRule::default_rule(),
            RedirectRule::page(1),
            RedirectRule::url("/login"),
            RedirectRule::callback("handlers::deny"),
            RedirectRule::message("No access"),
        ];
        for rule in kinds {
            let json = serde_json::to_value(&rule).unwrap();
            assert_eq!(json["type"], rule.kind.variant_name());
        }
    }
}
