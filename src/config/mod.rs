//! Configuration loading and types

mod loader;
mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::{
    AppConfig, LogFormat, LoggingConfig, PermissionEntry, PolicyConfig, RedirectEntry,
    VariantTablesConfig,
};
