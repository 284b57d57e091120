//! Configuration management commands.

use std::path::Path;

use anyhow::{bail, Result};
use grocer_catalog::catalog::CategoryTag;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
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
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("[catalog]");
    ctx.output.kv("base_path", &ctx.config.catalog.base_path);
    ctx.output.kv("namespace", &ctx.config.catalog.namespace);

    ctx.output.info("[store]");
    ctx.output.kv("dir", &ctx.config.store.dir);

    ctx.output.info("[classifier]");
    ctx.output
        .kv("default_fallback", &ctx.config.classifier.default_fallback);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let config_path = match ctx.config_path {
        Some(ref path) => path.to_string_lossy().to_string(),
        None => find_config_file(&ctx.cwd)?,
    };

    let mut config = CliConfig::load(&config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check(&ctx.config, |path| ctx.resolve_path(path).exists());

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

/// Errors and warnings for a config. `exists` answers whether a configured
/// path is present.
fn check(config: &CliConfig, exists: impl Fn(&str) -> bool) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.catalog.namespace.trim().is_empty() {
        errors.push("catalog.namespace must not be empty".to_string());
    }
    if config.catalog.namespace.contains(':') {
        errors.push("catalog.namespace must not contain ':'".to_string());
    }
    if CategoryTag::parse(&config.classifier.default_fallback).is_none() {
        errors.push(format!(
            "classifier.default_fallback '{}' is not a category; expected one of: {}",
            config.classifier.default_fallback,
            CategoryTag::ALL.map(|t| t.as_str()).join(", ")
        ));
    }
    if config.store.dir.trim().is_empty() {
        errors.push("store.dir must not be empty".to_string());
    }
    if !exists(&config.catalog.base_path) {
        warnings.push(format!(
            "catalog.base_path '{}' does not exist; the base catalog will be empty",
            config.catalog.base_path
        ));
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["catalog", "base_path"] => Ok(config.catalog.base_path.clone()),
        ["catalog", "namespace"] => Ok(config.catalog.namespace.clone()),
        ["store", "dir"] => Ok(config.store.dir.clone()),
        ["classifier", "default_fallback"] => Ok(config.classifier.default_fallback.clone()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["catalog", "base_path"] => config.catalog.base_path = value.to_string(),
        ["catalog", "namespace"] => config.catalog.namespace = value.to_string(),
        ["store", "dir"] => config.store.dir = value.to_string(),
        ["classifier", "default_fallback"] => {
            let tag: CategoryTag = value.parse()?;
            config.classifier.default_fallback = tag.as_str().to_string();
        }
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}

fn find_config_file(cwd: &Path) -> Result<String> {
    for name in CONFIG_FILE_NAMES {
        let path = cwd.join(name);
        if path.exists() {
            return Ok(path.to_string_lossy().to_string());
        }
    }
    bail!("No config file found. Run `grocer config init` to create one.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        let (errors, warnings) = check(&CliConfig::default(), |_| true);
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_check_reports_bad_values() {
        let mut config = CliConfig::default();
        config.catalog.namespace = "a:b".to_string();
        config.classifier.default_fallback = "snacks".to_string();

        let (errors, warnings) = check(&config, |_| false);
        assert_eq!(errors.len(), 2);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_get_and_set_values() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "catalog.namespace", "staging").unwrap();
        set_config_value(&mut config, "classifier.default_fallback", "Spices-Herbs").unwrap();

        assert_eq!(get_config_value(&config, "catalog.namespace").unwrap(), "staging");
        assert_eq!(
            get_config_value(&config, "classifier.default_fallback").unwrap(),
            "spices-herbs"
        );
        assert!(set_config_value(&mut config, "classifier.default_fallback", "snacks").is_err());
        assert!(get_config_value(&config, "deploy.canary").is_err());
    }
}
