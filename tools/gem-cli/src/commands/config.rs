//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use gem_catalog::prelude::SortOption;
use gem_observability::{LogFormat, LogLevel};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv("path", &ctx.config.catalog.path);

    ctx.output.info("");
    ctx.output.info("[search]");
    ctx.output.kv("per_page", &ctx.config.search.per_page.to_string());
    ctx.output.kv("sort", &ctx.config.search.sort);
    ctx.output.kv("facets", &ctx.config.search.facets.to_string());

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv("format", &ctx.config.logging.format);
    ctx.output.kv("metrics", &ctx.config.logging.metrics.to_string());

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(config_path) = &ctx.config_path else {
        bail!("No config file found. Run `gem config init` to create one.");
    };
    let path = config_path.to_string_lossy();

    let mut config = CliConfig::load(&path)?;
    set_config_value(&mut config, key, value)?;
    check_config(&config).into_result()?;
    config.save(&path)?;
    ctx.logger("config").info("config updated");

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let catalog = ctx
        .cwd
        .read_dir()
        .ok()
        .and_then(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .find(|name| name.ends_with(".json") && name.contains("catalog"))
        })
        .unwrap_or_else(|| "catalog.json".to_string());

    fs::write(&config_path, generate_default_config(&catalog))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let report = check_config(&ctx.config);

    if !ctx.resolve_path(&ctx.config.catalog.path).exists() {
        ctx.output.warn(&format!(
            "Warning: catalog.path '{}' does not exist",
            ctx.config.catalog.path
        ));
    }

    if report.errors.len() > 1 {
        for error in &report.errors {
            ctx.output.error(&format!("Error: {}", error));
        }
    }

    report.into_result()?;
    ctx.output.success("Configuration is valid");

    Ok(())
}

#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
}

impl Report {
    fn into_result(self) -> Result<()> {
        match self.errors.as_slice() {
            [] => Ok(()),
            [only] => bail!("{}", only),
            errors => bail!("Configuration has {} error(s)", errors.len()),
        }
    }
}

fn check_config(config: &CliConfig) -> Report {
    let mut report = Report::default();

    if config.catalog.path.trim().is_empty() {
        report.errors.push("catalog.path is required".to_string());
    }
    if !(1..=100).contains(&config.search.per_page) {
        report
            .errors
            .push("search.per_page must be 1-100".to_string());
    }
    if SortOption::from_str(&config.search.sort).is_none() {
        report
            .errors
            .push(format!("search.sort '{}' is not a sort order", config.search.sort));
    }
    if LogLevel::from_str(&config.logging.level).is_none() {
        report
            .errors
            .push(format!("logging.level '{}' is not a level", config.logging.level));
    }
    if LogFormat::from_str(&config.logging.format).is_none() {
        report.errors.push(format!(
            "logging.format '{}' must be json or human",
            config.logging.format
        ));
    }

    report
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["catalog", "path"] => Ok(config.catalog.path.clone()),
        ["search", "per_page"] => Ok(config.search.per_page.to_string()),
        ["search", "sort"] => Ok(config.search.sort.clone()),
        ["search", "facets"] => Ok(config.search.facets.to_string()),
        ["logging", "level"] => Ok(config.logging.level.clone()),
        ["logging", "format"] => Ok(config.logging.format.clone()),
        ["logging", "metrics"] => Ok(config.logging.metrics.to_string()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["catalog", "path"] => config.catalog.path = value.to_string(),
        ["search", "per_page"] => config.search.per_page = value.parse()?,
        ["search", "sort"] => config.search.sort = value.to_string(),
        ["search", "facets"] => config.search.facets = value.parse()?,
        ["logging", "level"] => config.logging.level = value.to_string(),
        ["logging", "format"] => config.logging.format = value.to_string(),
        ["logging", "metrics"] => config.logging.metrics = value.parse()?,
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(check_config(&CliConfig::default()).errors.is_empty());
    }

    #[test]
    fn test_bad_values_reported() {
        let mut config = CliConfig::default();
        config.search.per_page = 0;
        config.search.sort = "random".to_string();
        config.logging.format = "xml".to_string();

        let report = check_config(&config);
        assert_eq!(report.errors.len(), 3);
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_get_and_set_values() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "search.per_page", "48").unwrap();
        set_config_value(&mut config, "logging.metrics", "true").unwrap();

        assert_eq!(get_config_value(&config, "search.per_page").unwrap(), "48");
        assert_eq!(get_config_value(&config, "logging.metrics").unwrap(), "true");
        assert!(set_config_value(&mut config, "search.per_page", "many").is_err());
        assert!(get_config_value(&config, "deploy.canary").is_err());
    }

    #[test]
    fn test_config_found_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("catalogs").join("2026");
        fs::create_dir_all(&nested).unwrap();
        assert!(Context::find_config(&nested).is_none());

        fs::write(dir.path().join(".gem.toml"), "[search]\nper_page = 12\n").unwrap();
        let (config, path) = Context::find_config(&nested).unwrap();
        assert_eq!(path, dir.path().join(".gem.toml"));
        assert_eq!(config.search.per_page, 12);

        let mut updated = config.clone();
        set_config_value(&mut updated, "search.sort", "price_asc").unwrap();
        updated.save(path.to_str().unwrap()).unwrap();

        let (reloaded, _) = Context::find_config(&nested).unwrap();
        assert_eq!(reloaded.search.sort, "price_asc");
        assert_eq!(reloaded.search.per_page, 12);
    }
}
