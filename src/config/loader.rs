//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (WARDEN_*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "warden.toml",
    ".warden.toml",
    "~/.config/warden/config.toml",
    "/etc/warden/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Add environment variables with WARDEN_ prefix
    // e.g., WARDEN_LOGGING__LEVEL=debug
    // Double underscore (__) maps to nested keys (logging.level)
    builder = builder.add_source(
        Environment::with_prefix("WARDEN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // Build and deserialize
    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
///
/// Family tokens are compiled here so a malformed table is reported at
/// load time, not on the first rule write.
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => {
            return Err(ConfigError::Invalid {
                message: format!("unknown logging.level '{}'", other),
            });
        }
    }

    config.feature_tables()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[logging]
level = "debug"

[features.access_denied]
page_redirect = ["3xx"]
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.features.contains_key("access_denied"));
    }

    #[test]
    fn test_load_config_with_policy_section() {
        let toml = r#"
[policy]
roles = ["editor"]
pages = [12]

[[policy.users]]
user_id = 42
roles = ["editor"]
level = 7

[[policy.permissions]]
level = "role:editor"
resource = { resource_type = "post", identifier = 7 }
set = { read = { effect = "allow" } }

[[policy.redirects]]
level = "default"
feature = "access_denied"
rule = { type = "page_redirect", page_id = 12, http_status_code = 302 }

[[policy.governance]]
rule_type = "role_level"
target = { level = 5 }
permissions = { list_user = "deny" }
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.policy.roles, vec!["editor"]);
        assert_eq!(config.policy.users[0].user_id, 42);
        assert_eq!(config.policy.permissions.len(), 1);
        assert_eq!(config.policy.redirects.len(), 1);
        assert_eq!(config.policy.governance.len(), 1);
    }

    #[test]
    fn test_invalid_logging_level_error() {
        let toml = r#"
[logging]
level = "chatty"
"#;
        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_malformed_family_token_error() {
        let toml = r#"
[features.logout]
default = ["9xx"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStatusFamily { .. }));
    }

    #[test]
    fn test_unknown_feature_error() {
        let toml = r#"
[features.teleport]
default = ["4xx"]
"#;
        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
