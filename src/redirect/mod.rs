//! Redirect rule module
//!
//! Models what happens on denial: the tagged rule variants, the per-variant
//! status-code tables, the validator enforcing each variant's contract, and
//! the service that stores rules per `(access level, feature)`.
//!
//! ## Rule model
//!
//! Four features (access-denied, logout, 404, URL-access) share one variant
//! set and one validator; each feature is parameterized by its own
//! status-code table set:
//!
//! | variant | required field | status range |
//! |---|---|---|
//! | `default` | (none) | 4xx, 5xx |
//! | `page_redirect` | `page_id` | 3xx |
//! | `url_redirect` | `url` | 3xx |
//! | `trigger_callback` | `callback` | 3xx–5xx |
//! | `custom_message` | `message` | 4xx, 5xx |

pub mod rule;
pub mod service;
pub mod status;
pub mod validator;

pub use rule::{Feature, RedirectKind, RedirectRule};
pub use service::RedirectService;
pub use status::{FeatureTables, StatusCodeTable, StatusFamily, VariantTables};
pub use validator::{
    CallbackRegistry, PageCatalog, RuleValidator, StaticCallbackRegistry, StaticPageCatalog,
};
