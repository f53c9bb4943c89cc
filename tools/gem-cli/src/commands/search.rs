//! Search a catalog.

use anyhow::{bail, Result};
use gem_catalog::prelude::*;
use gem_catalog::search::CriteriaMatcher;
use gem_observability::MetricsCollector;

use super::criteria::read_criteria;
use super::SearchArgs;
use crate::context::Context;
use crate::output::{format_price, format_weight, stock_badge};

const WIDTHS: [usize; 7] = [20, 32, 6, 12, 8, 14, 10];

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let mut metrics = MetricsCollector::new(ctx.search_id.clone());

    let spinner = ctx.output.spinner("Loading catalog...");
    let loaded = metrics.time("load", || ctx.load_catalog(args.catalog.catalog.as_deref()));
    spinner.finish_and_clear();
    let (gems, path) = loaded?;
    metrics.set_catalog(path.display().to_string());
    ctx.output
        .debug(&format!("Loaded {} gemstones from {}", gems.len(), path.display()));

    let logger = ctx
        .logger("search")
        .with_catalog(path.display().to_string());

    let engine = metrics.time("derive", || FilterEngine::new(&gems));
    logger
        .debug_builder("catalog loaded")
        .field_i64("items", engine.items().len() as i64)
        .field_f64("max_price", engine.ranges().max_price)
        .duration_us("load", metrics.phase_duration("load").unwrap_or_default())
        .emit();

    let mut criteria = match &args.criteria {
        Some(file) => {
            let saved = read_criteria(&ctx.resolve_path(file))?;
            saved.validate()?;
            let clamped = saved.clamp_to(engine.ranges());
            if clamped != saved {
                logger
                    .warn_builder("criteria ranges clamped to catalog")
                    .field("file", file.as_str())
                    .emit();
            }
            clamped
        }
        None => engine.default_criteria(),
    };
    apply_overrides(&mut criteria, &args);
    criteria.validate()?;

    let sort_name = args.sort.as_deref().unwrap_or(&ctx.config.search.sort);
    let Some(sort) = SortOption::from_str(sort_name) else {
        bail!("Unknown sort order: {}", sort_name);
    };
    let per_page = args.per_page.unwrap_or(ctx.config.search.per_page);

    let query = SearchQuery::new(criteria)
        .with_sort(sort)
        .with_pagination(args.page, per_page);

    let results = metrics.time("filter", || engine.search(&query));
    let query_time = metrics.phase_duration("filter").unwrap_or_default();
    let results = results.with_query_time(query_time.as_millis() as i64);
    metrics.set_counts(
        gems.len(),
        results.pagination.total as usize,
        results.items.len(),
    );

    let summary = metrics.finalize();

    let yield_active = CriteriaMatcher::new(&query.criteria, engine.ranges()).yield_active();
    logger
        .info_builder("search completed")
        .field_i64("matched", results.pagination.total)
        .field_i64("returned", results.items.len() as i64)
        .field("sort", sort.as_str())
        .field_bool("yield_active", yield_active)
        .field_i64(
            "filter_us",
            summary.phase("filter").map_or(0, |p| p.duration_us as i64),
        )
        .emit();
    logger
        .debug_builder("search metrics")
        .field("metrics", summary.to_json())
        .emit();

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    let active = query.criteria.active_filters(engine.ranges());
    if !active.is_empty() {
        ctx.output.header("Active filters");
        for filter in &active {
            ctx.output.kv(filter.field, &filter.value);
        }
    }

    ctx.output.header(&format!(
        "{} match(es), sorted by {}",
        results.pagination.total,
        sort.display_name()
    ));

    if results.is_empty() {
        ctx.output.info("No gemstones match these filters.");
    } else {
        ctx.output.table_row(
            &["ID", "NAME", "TYPE", "WEIGHT", "GRADE", "PRICE", "STOCK"],
            &WIDTHS,
        );
        ctx.output.info(&"-".repeat(WIDTHS.iter().sum::<usize>() + WIDTHS.len() * 2));

        for gem in &results.items {
            let kind = gem.kind();
            let weight = format_weight(gem.weight(), kind.weight_unit());
            let price = format_price(gem.price);
            let stock = stock_badge(gem.in_stock);
            ctx.output.table_row(
                &[
                    gem.id.as_str(),
                    &gem.name,
                    kind.as_str(),
                    &weight,
                    grade(gem),
                    &price,
                    &stock,
                ],
                &WIDTHS,
            );
        }

        let page = &results.pagination;
        ctx.output.info("");
        ctx.output.info(&format!(
            "Showing {}-{} of {} (page {} of {})",
            page.start_item(),
            page.end_item(),
            page.total,
            page.page,
            page.total_pages
        ));
        if page.total_pages > 1 {
            let links: Vec<String> = page
                .page_numbers(7)
                .into_iter()
                .map(|n| {
                    if n == page.page {
                        format!("[{}]", n)
                    } else {
                        n.to_string()
                    }
                })
                .collect();
            ctx.output.info(&format!("Pages: {}", links.join(" ")));
        }
    }

    if ctx.config.search.facets && !results.is_empty() {
        for facet in &results.facets {
            if facet.values.is_empty() {
                continue;
            }
            ctx.output.header(&facet.name);
            for value in &facet.values {
                let marker = if value.selected { " *" } else { "" };
                ctx.output
                    .list_item(&format!("{} ({}){}", value.value, value.count, marker));
            }
        }
    }

    if ctx.config.logging.metrics || ctx.output.is_verbose() {
        ctx.output.info("");
        ctx.output.info(&summary.to_summary());
    }

    Ok(())
}

/// Clarity for cut stones, crystal quality for rough ones.
fn grade(gem: &Gemstone) -> &str {
    gem.as_cut()
        .map(|cut| cut.clarity.as_str())
        .or_else(|| gem.as_rough().map(|rough| rough.crystal_quality.as_str()))
        .unwrap_or("-")
}

/// Layer command-line filters on top of the starting criteria.
fn apply_overrides(criteria: &mut FilterCriteria, args: &SearchArgs) {
    if let Some(q) = &args.query {
        criteria.search_term = q.clone();
    }

    let choices: [(&Option<String>, &mut Choice); 12] = [
        (&args.category, &mut criteria.category),
        (&args.origin, &mut criteria.origin),
        (&args.kind, &mut criteria.kind),
        (&args.color, &mut criteria.color),
        (&args.clarity, &mut criteria.clarity),
        (&args.cut_quality, &mut criteria.cut_quality),
        (&args.color_grade, &mut criteria.color_grade),
        (&args.symmetry, &mut criteria.symmetry),
        (&args.polish, &mut criteria.polish),
        (&args.color_intensity, &mut criteria.color_intensity),
        (&args.crystal_quality, &mut criteria.crystal_quality),
        (&args.transparency, &mut criteria.transparency),
    ];
    for (arg, choice) in choices {
        if let Some(value) = arg {
            *choice = Choice::from(value.as_str());
        }
    }

    if let Some(t) = &args.treatment {
        criteria.treatment = TreatmentChoice::from(t.as_str());
    }
    if let Some(c) = &args.certification {
        criteria.certification = CertificationChoice::from(c.as_str());
    }

    override_bounds(&mut criteria.price_range, args.min_price, args.max_price);
    override_bounds(&mut criteria.weight_range, args.min_weight, args.max_weight);
    let dims = &mut criteria.dimensions_range;
    override_bounds(&mut dims.length, args.min_length, args.max_length);
    override_bounds(&mut dims.width, args.min_width, args.max_width);
    override_bounds(&mut dims.height, args.min_height, args.max_height);
    override_bounds(
        &mut criteria.estimated_yield_range,
        args.min_yield,
        args.max_yield,
    );

    criteria.in_stock_only |= args.in_stock;
    criteria.has_videos |= args.has_videos;
    criteria.has_certificates |= args.has_certificates;
}

fn override_bounds(bounds: &mut Bounds, min: Option<f64>, max: Option<f64>) {
    if let Some(min) = min {
        bounds.min = min;
    }
    if let Some(max) = max {
        bounds.max = max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CatalogArgs;

    fn args() -> SearchArgs {
        SearchArgs {
            catalog: CatalogArgs { catalog: None },
            criteria: None,
            query: None,
            category: None,
            origin: None,
            kind: None,
            color: None,
            treatment: None,
            certification: None,
            min_price: None,
            max_price: None,
            min_weight: None,
            max_weight: None,
            min_length: None,
            max_length: None,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            min_yield: None,
            max_yield: None,
            clarity: None,
            cut_quality: None,
            color_grade: None,
            symmetry: None,
            polish: None,
            color_intensity: None,
            crystal_quality: None,
            transparency: None,
            in_stock: false,
            has_videos: false,
            has_certificates: false,
            sort: None,
            page: 1,
            per_page: None,
        }
    }

    #[test]
    fn test_no_overrides_keeps_criteria() {
        let base = FilterCriteria {
            price_range: Bounds::up_to(500.0),
            in_stock_only: true,
            ..FilterCriteria::default()
        };
        let mut criteria = base.clone();
        apply_overrides(&mut criteria, &args());
        assert_eq!(criteria, base);
    }

    #[test]
    fn test_overrides_replace_fields() {
        let mut a = args();
        a.category = Some("Ruby".to_string());
        a.kind = Some("rough".to_string());
        a.treatment = Some("untreated".to_string());
        a.certification = Some("GIA".to_string());
        a.max_price = Some(1000.0);
        a.has_videos = true;

        let mut criteria = FilterCriteria::defaults_for(&DataRanges {
            max_price: 5000.0,
            ..DataRanges::default()
        });
        apply_overrides(&mut criteria, &a);

        assert_eq!(criteria.category, Choice::only("Ruby"));
        assert_eq!(criteria.kind, Choice::only("rough"));
        assert_eq!(criteria.treatment, TreatmentChoice::Untreated);
        assert_eq!(criteria.certification, CertificationChoice::Lab("GIA".to_string()));
        assert_eq!(criteria.price_range, Bounds::new(0.0, 1000.0));
        assert!(criteria.has_videos);
        assert!(!criteria.in_stock_only);
    }

    #[test]
    fn test_cut_grade_and_dimension_overrides() {
        let mut a = args();
        a.symmetry = Some("Excellent".to_string());
        a.polish = Some("Very Good".to_string());
        a.color_intensity = Some("Vivid".to_string());
        a.min_length = Some(6.0);
        a.max_width = Some(8.0);
        a.min_height = Some(3.0);
        a.max_height = Some(5.0);

        let mut criteria = FilterCriteria::defaults_for(&DataRanges {
            max_length: 30.0,
            max_width: 16.0,
            max_height: 11.0,
            ..DataRanges::default()
        });
        apply_overrides(&mut criteria, &a);

        assert_eq!(criteria.symmetry, Choice::only("Excellent"));
        assert_eq!(criteria.polish, Choice::only("Very Good"));
        assert_eq!(criteria.color_intensity, Choice::only("Vivid"));
        assert_eq!(criteria.dimensions_range.length, Bounds::new(6.0, 30.0));
        assert_eq!(criteria.dimensions_range.width, Bounds::new(0.0, 8.0));
        assert_eq!(criteria.dimensions_range.height, Bounds::new(3.0, 5.0));
        assert!(criteria.clarity.is_all());
    }

    #[test]
    fn test_grade_per_kind() {
        let cut = Gemstone::cut("c", "Cut", "Ruby", CutDetails::new(1.0, "VVS2"));
        let rough = Gemstone::rough("r", "Rough", "Ruby", RoughDetails::new(9.0, "AA"));
        assert_eq!(grade(&cut), "VVS2");
        assert_eq!(grade(&rough), "AA");
    }

    #[test]
    fn test_all_resets_choice() {
        let mut a = args();
        a.origin = Some("all".to_string());
        let mut criteria = FilterCriteria {
            origin: Choice::only("Burma"),
            ..FilterCriteria::default()
        };
        apply_overrides(&mut criteria, &a);
        assert!(criteria.origin.is_all());
    }
}
