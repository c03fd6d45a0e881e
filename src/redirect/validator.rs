//! Redirect rule validation
//!
//! The `type` tag selects the variant up front; field validation is
//! conditional on that selection. Validation is fail-fast: the first
//! failing field's error is returned, failures are never aggregated.

use crate::error::{ValidationError, ValidationResult};
use crate::redirect::rule::{RedirectKind, RedirectRule};
use crate::redirect::status::VariantTables;
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use url::Url;

/// Segmented callable path, e.g. `handlers::render_denied`
static CALLBACK_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("callback syntax pattern is well-formed")
});

/// Page existence lookup, owned by the host platform
pub trait PageCatalog: Send + Sync {
    fn page_exists(&self, page_id: u64) -> bool;
}

/// Callable resolution in the host environment
pub trait CallbackRegistry: Send + Sync {
    fn is_callable(&self, reference: &str) -> bool;
}

/// In-memory page catalog for tests and the CLI policy loader
#[derive(Debug, Default)]
pub struct StaticPageCatalog {
    pages: HashSet<u64>,
}

impl StaticPageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page_id: u64) -> Self {
        self.pages.insert(page_id);
        self
    }
}

impl PageCatalog for StaticPageCatalog {
    fn page_exists(&self, page_id: u64) -> bool {
        self.pages.contains(&page_id)
    }
}

/// In-memory callback registry for tests and the CLI policy loader
#[derive(Debug, Default)]
pub struct StaticCallbackRegistry {
    callables: HashSet<String>,
}

impl StaticCallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callable(mut self, reference: impl Into<String>) -> Self {
        self.callables.insert(reference.into());
        self
    }
}

impl CallbackRegistry for StaticCallbackRegistry {
    fn is_callable(&self, reference: &str) -> bool {
        self.callables.contains(reference)
    }
}

/// Validates and normalizes candidate redirect rules
///
/// One validator serves every consuming feature; only the status-code
/// tables passed to `validate` differ.
pub struct RuleValidator {
    pages: Arc<dyn PageCatalog>,
    callbacks: Arc<dyn CallbackRegistry>,
}

impl RuleValidator {
    pub fn new(pages: Arc<dyn PageCatalog>, callbacks: Arc<dyn CallbackRegistry>) -> Self {
        Self { pages, callbacks }
    }

    /// Validate a candidate rule against its variant's contract
    ///
    /// Returns the accepted (normalized) rule, or the first failing field's
    /// error. Variant fields are checked before the status code.
    pub fn validate(
        &self,
        candidate: &RedirectRule,
        tables: &VariantTables,
    ) -> ValidationResult<RedirectRule> {
        let kind = match &candidate.kind {
            RedirectKind::Default => RedirectKind::Default,
            RedirectKind::PageRedirect { page_id } => {
                if !self.pages.page_exists(*page_id) {
                    return Err(ValidationError::new(
                        "page_id",
                        format!("referenced page {} does not exist", page_id),
                    ));
                }
                RedirectKind::PageRedirect { page_id: *page_id }
            }
            RedirectKind::UrlRedirect { url } => {
                validate_redirect_url(url)?;
                RedirectKind::UrlRedirect { url: url.clone() }
            }
            RedirectKind::TriggerCallback { callback } => {
                if callback.trim().is_empty() {
                    return Err(ValidationError::missing("callback"));
                }
                if !CALLBACK_SYNTAX.is_match(callback) {
                    return Err(ValidationError::new(
                        "callback",
                        "not a well-formed callable reference",
                    ));
                }
                if !self.callbacks.is_callable(callback) {
                    return Err(ValidationError::new(
                        "callback",
                        format!("'{}' does not resolve to a registered callable", callback),
                    ));
                }
                RedirectKind::TriggerCallback {
                    callback: callback.clone(),
                }
            }
            RedirectKind::CustomMessage { message } => {
                let trimmed = message.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::new(
                        "message",
                        "message is empty after trimming",
                    ));
                }
                if trimmed.contains('<') || trimmed.contains('>') {
                    return Err(ValidationError::new(
                        "message",
                        "message contains unescaped markup",
                    ));
                }
                RedirectKind::CustomMessage {
                    message: trimmed.to_string(),
                }
            }
        };

        if let Some(code) = candidate.http_status_code {
            let table = tables.for_kind(&kind);
            if table.is_empty() {
                return Err(ValidationError::status_not_accepted(code));
            }
            if !table.contains(code) {
                return Err(ValidationError::status_out_of_range(code, table.describe()));
            }
        }

        Ok(RedirectRule {
            kind,
            http_status_code: candidate.http_status_code,
        })
    }
}

/// A redirect target must be a syntactically valid absolute URL or a
/// root-relative path
fn validate_redirect_url(raw: &str) -> ValidationResult<()> {
    if raw.trim().is_empty() {
        return Err(ValidationError::missing("url"));
    }
    if raw.starts_with('/') {
        let base = Url::parse("http://localhost/")
            .map_err(|e| ValidationError::new("url", e.to_string()))?;
        base.join(raw)
            .map_err(|e| ValidationError::new("url", e.to_string()))?;
        return Ok(());
    }
    match Url::parse(raw) {
        Ok(parsed) if !parsed.cannot_be_a_base() => Ok(()),
        Ok(_) => Err(ValidationError::new(
            "url",
            "must be an absolute or root-relative URL",
        )),
        Err(e) => Err(ValidationError::new("url", e.to_string())),
    }
}
