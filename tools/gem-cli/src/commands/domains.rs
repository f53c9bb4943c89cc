//! Show the filter domains of a catalog.

use anyhow::Result;
use gem_catalog::prelude::*;

use super::CatalogArgs;
use crate::context::Context;
use crate::output::{format_price, format_weight};

/// Run the ranges command.
pub async fn run_ranges(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let (gems, path) = ctx.load_catalog(args.catalog.as_deref())?;
    let engine = FilterEngine::new(&gems);
    let ranges = engine.ranges();

    ctx.logger("ranges")
        .debug_builder("ranges derived")
        .field_i64("items", gems.len() as i64)
        .emit();

    if ctx.output.is_json() {
        ctx.output.json(ranges);
        return Ok(());
    }

    ctx.output
        .header(&format!("Ranges for {} ({} items)", path.display(), gems.len()));
    ctx.output.kv("price", &format_price(ranges.max_price));
    ctx.output.kv("weight", &format_weight(ranges.max_weight, "ct/g"));
    ctx.output.kv("length", &format!("{} mm", ranges.max_length));
    ctx.output.kv("width", &format!("{} mm", ranges.max_width));
    ctx.output.kv("height", &format!("{} mm", ranges.max_height));
    ctx.output.kv("yield", &format_weight(ranges.max_yield, "ct"));

    Ok(())
}

/// Run the options command.
pub async fn run_options(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let (gems, path) = ctx.load_catalog(args.catalog.as_deref())?;
    let engine = FilterEngine::new(&gems);
    let options = engine.options();
    ctx.logger("options").debug("options derived");

    if ctx.output.is_json() {
        ctx.output.json(options);
        return Ok(());
    }

    ctx.output
        .header(&format!("Options for {} ({} items)", path.display(), gems.len()));

    let groups: [(&str, &Vec<String>); 13] = [
        ("category", &options.categories),
        ("origin", &options.origins),
        ("color", &options.colors),
        ("treatment", &options.treatments),
        ("certification lab", &options.labs),
        ("clarity", &options.clarities),
        ("cut quality", &options.cut_qualities),
        ("symmetry", &options.symmetries),
        ("polish", &options.polishes),
        ("color grade", &options.color_grades),
        ("color intensity", &options.color_intensities),
        ("crystal quality", &options.crystal_qualities),
        ("transparency", &options.transparencies),
    ];

    for (label, values) in groups {
        if values.is_empty() {
            ctx.output.kv(label, "-");
        } else {
            ctx.output.kv(label, &values.join(", "));
        }
    }

    Ok(())
}
