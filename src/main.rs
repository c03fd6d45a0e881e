//! Warden CLI
//!
//! Thin transport glue over the policy engine: loads layered configuration
//! plus a policy section, seeds the in-memory stores, and answers
//! permission, redirect, and governance queries.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use warden::access::{AccessLevel, Identifier, ResourceRef, ResourceType};
use warden::config::load_config;
use warden::engine::Engine;
use warden::redirect::Feature;

/// Access-control policy resolution engine
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "WARDEN_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WARDEN_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the effective permission set for a subject and resource
    Check {
        /// Subject (visitor, default, role:<slug>, user:<id>)
        #[arg(long, value_parser = parse_level)]
        level: AccessLevel,

        /// Resource type (post, post_type, taxonomy, term, role, user,
        /// menu, metabox, widget, api_route, url, capability)
        resource_type: String,

        /// Resource identifier (numeric id, slug, or "method path")
        identifier: String,

        /// Optional permission key to report on specifically
        key: Option<String>,
    },

    /// Find the effective redirect rule for a subject and feature
    Redirect {
        /// Subject (visitor, default, role:<slug>, user:<id>)
        #[arg(long, value_parser = parse_level)]
        level: AccessLevel,

        /// Feature (access_denied, logout, not_found, url_access)
        #[arg(long, value_parser = parse_feature)]
        feature: Feature,
    },

    /// Resolve governance effects for a user
    Principal {
        /// User id
        #[arg(long)]
        user: u64,
    },
}

fn parse_level(s: &str) -> Result<AccessLevel, String> {
    AccessLevel::try_parse(s).ok_or_else(|| {
        format!(
            "invalid access level '{}' (expected visitor, default, role:<slug>, or user:<id>)",
            s
        )
    })
}

fn parse_feature(s: &str) -> Result<Feature, String> {
    Feature::try_parse(s).ok_or_else(|| {
        format!(
            "invalid feature '{}' (expected access_denied, logout, not_found, or url_access)",
            s
        )
    })
}

fn parse_resource(resource_type: &str, identifier: &str) -> anyhow::Result<ResourceRef> {
    let Some(resource_type) = ResourceType::try_parse(resource_type) else {
        bail!("unknown resource type '{}'", resource_type);
    };

    if resource_type == ResourceType::ApiRoute {
        let Some((method, path)) = identifier.split_once(' ') else {
            bail!("api_route identifier must be of the form \"METHOD path\"");
        };
        return Ok(ResourceRef::api_route(method, path));
    }

    let identifier = match identifier.parse::<u64>() {
        Ok(id) => Identifier::Id(id),
        Err(_) => Identifier::Key(identifier.to_string()),
    };
    Ok(ResourceRef::new(resource_type, identifier))
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting warden");

    // Load configuration and seed the engine from its policy section
    let config = load_config(args.config.as_deref())
        .inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    let tables = config.feature_tables()?;
    let engine = Engine::from_policy(&config.policy, tables)
        .inspect_err(|e| error!(error = %e, "Failed to build engine from policy"))?;

    match args.command {
        Command::Check {
            level,
            resource_type,
            identifier,
            key,
        } => {
            let resource = parse_resource(&resource_type, &identifier)?;
            let effective = engine
                .resolver()
                .resolve(&level, &resource)
                .with_context(|| format!("resolving {} for {}", resource, level))?;

            let output = match key {
                Some(key) => json!({
                    "key": key,
                    "effect": effective.effect_of(&key),
                    "is_customized": effective.is_customized,
                    "source_level": effective.source_level.clone(),
                }),
                None => serde_json::to_value(&effective)?,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Redirect { level, feature } => {
            let effective = engine.redirects().effective(&level, feature)?;
            let output = match effective {
                Some((rule, source)) => json!({ "rule": rule, "source_level": source }),
                None => json!({ "rule": null }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Principal { user } => {
            let Some(identity) = config
                .policy
                .users
                .iter()
                .find(|u| u.user_id == user)
                .cloned()
            else {
                bail!("user {} not found in policy", user);
            };
            let effects = engine.governance().resolve_for_principal(&identity)?;
            println!("{}", serde_json::to_string_pretty(&effects)?);
        }
    }

    Ok(())
}
