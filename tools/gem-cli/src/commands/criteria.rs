//! Criteria file management.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use dialoguer::Confirm;
use gem_catalog::prelude::*;

use super::{CatalogArgs, CriteriaArgs, CriteriaCommand};
use crate::context::Context;

/// Run the criteria command.
pub async fn run(args: CriteriaArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CriteriaCommand::Init {
            catalog,
            output,
            force,
        } => init_criteria(catalog, &output, force, ctx).await,
        CriteriaCommand::Validate { file } => validate_criteria(&file, ctx).await,
        CriteriaCommand::Show { file, catalog } => show_criteria(&file, catalog, ctx).await,
        CriteriaCommand::Save {
            name,
            from,
            output,
            force,
        } => save_criteria(&name, &from, output, force, ctx).await,
    }
}

/// Read plain criteria or the criteria inside a saved search.
pub fn read_criteria(path: &Path) -> Result<FilterCriteria> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read criteria: {}", path.display()))?;
    parse_criteria(&content).with_context(|| format!("Invalid criteria: {}", path.display()))
}

fn parse_criteria(content: &str) -> Result<FilterCriteria> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let criteria = if value.get("criteria").is_some() {
        SavedSearch::from_json(content)?.criteria
    } else {
        serde_json::from_value(value)?
    };
    Ok(criteria)
}

async fn init_criteria(
    catalog: CatalogArgs,
    output: &str,
    force: bool,
    ctx: &Context,
) -> Result<()> {
    let (gems, _) = ctx.load_catalog(catalog.catalog.as_deref())?;
    let criteria = FilterEngine::new(&gems).default_criteria();

    let path = ctx.resolve_path(output);
    if !confirm_overwrite(&path, force, ctx)? {
        return Ok(());
    }

    fs::write(&path, serde_json::to_string_pretty(&criteria)?)?;
    ctx.output.success(&format!("Created: {}", path.display()));

    Ok(())
}

async fn validate_criteria(file: &str, ctx: &Context) -> Result<()> {
    let criteria = read_criteria(&ctx.resolve_path(file))?;
    criteria.validate()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "valid": true }));
    } else {
        ctx.output.success("Criteria are valid");
    }

    Ok(())
}

async fn show_criteria(file: &str, catalog: CatalogArgs, ctx: &Context) -> Result<()> {
    let criteria = read_criteria(&ctx.resolve_path(file))?;
    let (gems, _) = ctx.load_catalog(catalog.catalog.as_deref())?;
    let ranges = derive_ranges(&gems);
    let active = criteria.active_filters(&ranges);

    if ctx.output.is_json() {
        ctx.output.json(&active);
        return Ok(());
    }

    ctx.output.header(&format!("Active filters in {}", file));
    if active.is_empty() {
        ctx.output.info("None; every item matches.");
    }
    for filter in &active {
        ctx.output.kv(filter.field, &filter.value);
    }

    Ok(())
}

async fn save_criteria(
    name: &str,
    from: &str,
    output: Option<String>,
    force: bool,
    ctx: &Context,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Saved search name cannot be empty");
    }

    let criteria = read_criteria(&ctx.resolve_path(from))?;
    criteria.validate()?;

    let saved = SavedSearch::new(name, criteria, Utc::now().timestamp());
    let output = output.unwrap_or_else(|| format!("{}.search.json", slug(name)));
    let path = ctx.resolve_path(&output);
    if !confirm_overwrite(&path, force, ctx)? {
        return Ok(());
    }

    fs::write(&path, saved.to_json()?)?;
    ctx.logger("criteria")
        .info_builder("saved search written")
        .field("id", saved.id.as_str())
        .field("path", path.display().to_string())
        .emit();
    ctx.output
        .success(&format!("Saved '{}' to {}", saved.name, path.display()));

    Ok(())
}

fn confirm_overwrite(path: &Path, force: bool, ctx: &Context) -> Result<bool> {
    if !path.exists() || force {
        return Ok(true);
    }
    if ctx.output.is_json() {
        bail!(
            "File already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Overwrite {}?", path.display()))
        .default(false)
        .interact()?;
    if !confirmed {
        ctx.output.warn("Cancelled");
    }
    Ok(confirmed)
}

fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_criteria() {
        let criteria = parse_criteria(r#"{"category":"Ruby","priceRange":[0,500]}"#).unwrap();
        assert_eq!(criteria.category, Choice::only("Ruby"));
        assert_eq!(criteria.price_range, Bounds::new(0.0, 500.0));
    }

    #[test]
    fn test_parse_saved_search() {
        let criteria = FilterCriteria {
            in_stock_only: true,
            ..FilterCriteria::default()
        };
        let saved = SavedSearch::new("in stock", criteria.clone(), 1_700_000_000);
        let parsed = parse_criteria(&saved.to_json().unwrap()).unwrap();
        assert_eq!(parsed, criteria);
    }

    #[test]
    fn test_parse_rejects_inverted_saved_range() {
        let json = r#"{"id":"s-1","name":"bad","savedAt":0,"criteria":{"priceRange":[10,1]}}"#;
        assert!(parse_criteria(json).is_err());
    }

    #[test]
    fn test_read_criteria_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        fs::write(&path, r#"{"type":"rough"}"#).unwrap();
        let criteria = read_criteria(&path).unwrap();
        assert_eq!(criteria.kind, Choice::only("rough"));
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Blue Sapphires"), "blue-sapphires");
        assert_eq!(slug("Rubies < 5k"), "rubies---5k");
        assert_eq!(slug("  Sapphires "), "sapphires");
    }
}
