//! Filter domains derived from a gemstone collection.
//!
//! Both snapshots are recomputed from scratch whenever the collection changes
//! and are never updated in place.

use std::collections::BTreeSet;

use crate::catalog::{Gemstone, GemstoneVariant};
use serde::{Deserialize, Serialize};

/// Upper bounds of every numeric facet observed in a collection.
///
/// Each maximum is `0` when no item contributes to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRanges {
    pub max_price: f64,
    /// Max over carat weight of cut stones and gram weight of rough stones.
    pub max_weight: f64,
    pub max_length: f64,
    pub max_width: f64,
    pub max_height: f64,
    /// Max estimated carat yield over rough stones, missing counted as `0`.
    pub max_yield: f64,
}

/// Distinct categorical values observed in a collection, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub origins: Vec<String>,
    pub colors: Vec<String>,
    /// `"untreated"` plus every treatment type in use.
    pub treatments: Vec<String>,
    /// Certification labs of certified stones.
    pub labs: Vec<String>,

    // Cut-only
    pub clarities: Vec<String>,
    pub cut_qualities: Vec<String>,
    pub symmetries: Vec<String>,
    pub polishes: Vec<String>,
    pub color_grades: Vec<String>,
    pub color_intensities: Vec<String>,

    // Rough-only
    pub crystal_qualities: Vec<String>,
    pub transparencies: Vec<String>,
}

/// Compute the numeric domains of a collection.
pub fn derive_ranges(items: &[Gemstone]) -> DataRanges {
    let max_of = |f: fn(&Gemstone) -> Option<f64>| items.iter().filter_map(f).fold(0.0, f64::max);

    DataRanges {
        max_price: max_of(|g| Some(g.price)),
        max_weight: max_of(|g| Some(g.weight())),
        max_length: max_of(|g| Some(g.dimensions.length)),
        max_width: max_of(|g| Some(g.dimensions.width)),
        max_height: max_of(|g| Some(g.dimensions.height)),
        max_yield: max_of(Gemstone::estimated_yield),
    }
}

#[derive(Default)]
struct OptionSets {
    categories: BTreeSet<String>,
    origins: BTreeSet<String>,
    colors: BTreeSet<String>,
    treatments: BTreeSet<String>,
    labs: BTreeSet<String>,
    clarities: BTreeSet<String>,
    cut_qualities: BTreeSet<String>,
    symmetries: BTreeSet<String>,
    polishes: BTreeSet<String>,
    color_grades: BTreeSet<String>,
    color_intensities: BTreeSet<String>,
    crystal_qualities: BTreeSet<String>,
    transparencies: BTreeSet<String>,
}

fn collect(set: &mut BTreeSet<String>, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        if !set.contains(v) {
            set.insert(v.to_string());
        }
    }
}

/// Compute the categorical domains of a collection.
pub fn derive_options(items: &[Gemstone]) -> FilterOptions {
    let mut sets = OptionSets::default();

    for gem in items {
        collect(&mut sets.categories, Some(gem.category.as_str()));
        collect(&mut sets.origins, Some(gem.origin.as_str()));
        collect(&mut sets.colors, gem.color.as_deref());
        collect(&mut sets.treatments, gem.treatment_label());
        if gem.certification.certified {
            collect(&mut sets.labs, gem.certification.lab.as_deref());
        }

        match &gem.variant {
            GemstoneVariant::Cut(cut) => {
                collect(&mut sets.clarities, Some(cut.clarity.as_str()));
                collect(&mut sets.cut_qualities, cut.cut_quality.as_deref());
                collect(&mut sets.symmetries, cut.symmetry.as_deref());
                collect(&mut sets.polishes, cut.polish.as_deref());
                collect(&mut sets.color_grades, cut.color_grade.as_deref());
                collect(&mut sets.color_intensities, cut.color_intensity.as_deref());
            }
            GemstoneVariant::Rough(rough) => {
                collect(&mut sets.crystal_qualities, Some(rough.crystal_quality.as_str()));
                collect(&mut sets.transparencies, rough.transparency.as_deref());
            }
        }
    }

    FilterOptions {
        categories: sets.categories.into_iter().collect(),
        origins: sets.origins.into_iter().collect(),
        colors: sets.colors.into_iter().collect(),
        treatments: sets.treatments.into_iter().collect(),
        labs: sets.labs.into_iter().collect(),
        clarities: sets.clarities.into_iter().collect(),
        cut_qualities: sets.cut_qualities.into_iter().collect(),
        symmetries: sets.symmetries.into_iter().collect(),
        polishes: sets.polishes.into_iter().collect(),
        color_grades: sets.color_grades.into_iter().collect(),
        color_intensities: sets.color_intensities.into_iter().collect(),
        crystal_qualities: sets.crystal_qualities.into_iter().collect(),
        transparencies: sets.transparencies.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Certification, CutDetails, Dimensions, RoughDetails, Treatment};

    fn collection() -> Vec<Gemstone> {
        let mut cut = CutDetails::new(3.2, "VS1");
        cut.cut_quality = Some("Excellent".to_string());
        cut.color_grade = Some("AAA".to_string());

        let mut rough = RoughDetails::new(12.5, "AA");
        rough.transparency = Some("Translucent".to_string());
        rough.estimated_carat_yield = Some(4.0);

        vec![
            Gemstone::cut("c-1", "Blue Sapphire", "Sapphire", cut)
                .with_origin("Sri Lanka")
                .with_color("Blue")
                .with_price(2500.0)
                .with_dimensions(Dimensions::new(9.0, 7.0, 4.5))
                .with_treatment(Treatment::treated("heated"))
                .with_certification(Certification::by_lab("GIA")),
            Gemstone::rough("r-1", "Ruby Rough", "Ruby", rough)
                .with_origin("Myanmar")
                .with_price(900.0)
                .with_dimensions(Dimensions::new(18.0, 11.0, 9.0)),
            Gemstone::rough("r-2", "Spinel Rough", "Spinel", RoughDetails::new(6.0, "A"))
                .with_origin("Myanmar")
                .with_color("")
                .with_price(300.0)
                .with_treatment(Treatment {
                    treated: true,
                    treatment_type: None,
                }),
        ]
    }

    #[test]
    fn test_empty_collection_ranges() {
        assert_eq!(derive_ranges(&[]), DataRanges::default());
        assert_eq!(derive_options(&[]), FilterOptions::default());
    }

    #[test]
    fn test_ranges() {
        let ranges = derive_ranges(&collection());
        assert_eq!(ranges.max_price, 2500.0);
        // gram weight of rough stones participates alongside carats
        assert_eq!(ranges.max_weight, 12.5);
        assert_eq!(ranges.max_length, 18.0);
        assert_eq!(ranges.max_width, 11.0);
        assert_eq!(ranges.max_height, 9.0);
        assert_eq!(ranges.max_yield, 4.0);
    }

    #[test]
    fn test_yield_ignores_cut_stones() {
        let only_cut = vec![collection().remove(0)];
        assert_eq!(derive_ranges(&only_cut).max_yield, 0.0);
    }

    #[test]
    fn test_options_sorted_and_deduplicated() {
        let options = derive_options(&collection());
        assert_eq!(options.categories, vec!["Ruby", "Sapphire", "Spinel"]);
        assert_eq!(options.origins, vec!["Myanmar", "Sri Lanka"]);
        assert_eq!(options.colors, vec!["Blue"]);
        assert_eq!(options.labs, vec!["GIA"]);
    }

    #[test]
    fn test_treatment_options() {
        let options = derive_options(&collection());
        // treated stone with no type contributes nothing
        assert_eq!(options.treatments, vec!["heated", "untreated"]);
    }

    #[test]
    fn test_variant_scoped_options() {
        let options = derive_options(&collection());
        assert_eq!(options.clarities, vec!["VS1"]);
        assert_eq!(options.cut_qualities, vec!["Excellent"]);
        assert_eq!(options.color_grades, vec!["AAA"]);
        assert!(options.symmetries.is_empty());
        assert_eq!(options.crystal_qualities, vec!["A", "AA"]);
        assert_eq!(options.transparencies, vec!["Translucent"]);
    }
}
