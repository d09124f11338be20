//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use seating_core::money::Currency;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let api = &ctx.config.api;
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &api.base_url);
    ctx.output.kv("fetch_timeout_ms", &api.fetch_timeout_ms.to_string());
    ctx.output.kv("submit_timeout_ms", &api.submit_timeout_ms.to_string());
    ctx.output.kv("cart_path", &api.cart_path);
    for (key, value) in &api.headers {
        ctx.output.kv(&format!("headers.{}", key), value);
    }

    ctx.output.info("[pricing]");
    for tier in &ctx.config.pricing.tiers {
        ctx.output
            .kv(&format!("up to {:.2}", tier.up_to), &format!("{:.2}", tier.fee));
    }
    ctx.output
        .kv("above", &format!("{:.2}", ctx.config.pricing.above));

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output
        .kv("format", &format!("{:?}", ctx.config.logging.format).to_lowercase());

    if !ctx.config.environments.is_empty() {
        ctx.output.info("Environments:");
        let mut names: Vec<&String> = ctx.config.environments.keys().collect();
        names.sort();
        for env in names {
            ctx.output.list_item(env, false);
        }
    }

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        match value {
            serde_json::Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("seating.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }
    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");
    Ok(())
}

/// Errors and warnings for a config, including every environment override.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut scopes = vec![(String::new(), config.clone())];
    let mut names: Vec<&String> = config.environments.keys().collect();
    names.sort();
    for name in names {
        scopes.push((format!("environments.{}.", name), config.for_environment(name)));
    }

    for (prefix, scoped) in &scopes {
        let api = &scoped.api;
        if !api.base_url.starts_with("http://") && !api.base_url.starts_with("https://") {
            errors.push(format!("{}api.base_url must be an http(s) URL", prefix));
        }
        if api.fetch_timeout_ms == 0 {
            errors.push(format!("{}api.fetch_timeout_ms must be positive", prefix));
        }
        if api.submit_timeout_ms == 0 {
            errors.push(format!("{}api.submit_timeout_ms must be positive", prefix));
        }
        if !api.cart_path.starts_with('/') {
            errors.push(format!("{}api.cart_path must start with '/'", prefix));
        }
        if let Err(e) = scoped.pricing.schedule(Currency::USD) {
            errors.push(format!("{}pricing: {:#}", prefix, e));
        }
        if scoped.pricing.tiers.is_empty() {
            warnings.push(format!("{}pricing.tiers is empty; every product pays the flat fee", prefix));
        }
    }

    if tracing_subscriber::EnvFilter::try_new(&config.logging.level).is_err() {
        errors.push(format!("logging.level '{}' is not a valid filter", config.logging.level));
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(config)?;
    for part in key.split('.') {
        value = match value {
            serde_json::Value::Object(mut map) => match map.remove(part) {
                Some(v) => v,
                None => bail!("Unknown config key: {}", key),
            },
            serde_json::Value::Array(mut items) => match part.parse::<usize>() {
                Ok(i) if i < items.len() => items.swap_remove(i),
                _ => bail!("Unknown config key: {}", key),
            },
            _ => bail!("Unknown config key: {}", key),
        };
    }
    Ok(value)
}
