//! The filter engine.
//!
//! Filtering is a conjunction of thirteen independent stages. Stage order only
//! affects how early an item is rejected, never whether it is: every stage
//! reads the item and the criteria and nothing else.

use crate::catalog::{Gemstone, GemstoneVariant};
use crate::search::{
    derive_options, derive_ranges, CertificationChoice, DataRanges, FilterCriteria, FilterOptions,
    SearchQuery, SearchResults, TreatmentChoice,
};

/// One independently evaluated filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterStage {
    /// Case-insensitive substring search over name, description, category and color.
    Text,
    /// Exact match on category, origin, kind and color.
    Categorical,
    Price,
    /// Carats for cut stones, grams for rough stones.
    Weight,
    Treatment,
    Certification,
    /// Clarity, cut quality, symmetry, polish, color grade and intensity.
    CutAttributes,
    /// Crystal quality and transparency.
    RoughAttributes,
    Dimensions,
    Videos,
    Certificates,
    EstimatedYield,
    InStock,
}

impl FilterStage {
    /// Every stage, in evaluation order.
    pub const ALL: [FilterStage; 13] = [
        FilterStage::Text,
        FilterStage::Categorical,
        FilterStage::Price,
        FilterStage::Weight,
        FilterStage::Treatment,
        FilterStage::Certification,
        FilterStage::CutAttributes,
        FilterStage::RoughAttributes,
        FilterStage::Dimensions,
        FilterStage::Videos,
        FilterStage::Certificates,
        FilterStage::EstimatedYield,
        FilterStage::InStock,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterStage::Text => "text",
            FilterStage::Categorical => "categorical",
            FilterStage::Price => "price",
            FilterStage::Weight => "weight",
            FilterStage::Treatment => "treatment",
            FilterStage::Certification => "certification",
            FilterStage::CutAttributes => "cut_attributes",
            FilterStage::RoughAttributes => "rough_attributes",
            FilterStage::Dimensions => "dimensions",
            FilterStage::Videos => "videos",
            FilterStage::Certificates => "certificates",
            FilterStage::EstimatedYield => "estimated_yield",
            FilterStage::InStock => "in_stock",
        }
    }
}

/// Criteria prepared for evaluation against many items.
#[derive(Debug)]
pub struct CriteriaMatcher<'c> {
    criteria: &'c FilterCriteria,
    term: Option<String>,
    yield_active: bool,
}

impl<'c> CriteriaMatcher<'c> {
    /// Prepare `criteria` for a collection whose domains are `ranges`.
    ///
    /// The yield range only constrains when it is narrower than
    /// `[0, ranges.max_yield]`; every other range always constrains.
    pub fn new(criteria: &'c FilterCriteria, ranges: &DataRanges) -> Self {
        Self {
            criteria,
            term: criteria.search_text().map(str::to_lowercase),
            yield_active: criteria
                .estimated_yield_range
                .is_narrower_than(ranges.max_yield),
        }
    }

    /// Whether the estimated-yield stage constrains anything.
    pub fn yield_active(&self) -> bool {
        self.yield_active
    }

    /// Whether `gem` passes every stage.
    pub fn matches(&self, gem: &Gemstone) -> bool {
        FilterStage::ALL.iter().all(|&stage| self.admits(stage, gem))
    }

    /// Whether `gem` passes a single stage.
    pub fn admits(&self, stage: FilterStage, gem: &Gemstone) -> bool {
        let c = self.criteria;
        match stage {
            FilterStage::Text => match &self.term {
                None => true,
                Some(term) => [
                    Some(gem.name.as_str()),
                    gem.description.as_deref(),
                    Some(gem.category.as_str()),
                    gem.color.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(term.as_str())),
            },
            FilterStage::Categorical => {
                c.category.admits(&gem.category)
                    && c.origin.admits(&gem.origin)
                    && c.kind.admits(gem.kind().as_str())
                    && c.color.admits_opt(gem.color.as_deref())
            }
            FilterStage::Price => c.price_range.contains(gem.price),
            FilterStage::Weight => c.weight_range.contains(gem.weight()),
            FilterStage::Treatment => match &c.treatment {
                TreatmentChoice::All => true,
                TreatmentChoice::Untreated => !gem.treatment.treated,
                TreatmentChoice::Type(t) => {
                    gem.treatment.treated
                        && gem.treatment.treatment_type.as_deref() == Some(t.as_str())
                }
            },
            FilterStage::Certification => {
                let cert = &gem.certification;
                match &c.certification {
                    CertificationChoice::All => true,
                    CertificationChoice::Certified => cert.certified,
                    CertificationChoice::Uncertified => !cert.certified,
                    CertificationChoice::Lab(lab) => {
                        cert.certified && cert.lab.as_deref() == Some(lab.as_str())
                    }
                }
            }
            FilterStage::CutAttributes => {
                let selectors = [
                    &c.clarity,
                    &c.cut_quality,
                    &c.symmetry,
                    &c.polish,
                    &c.color_grade,
                    &c.color_intensity,
                ];
                if selectors.iter().all(|s| s.is_all()) {
                    return true;
                }
                match &gem.variant {
                    GemstoneVariant::Cut(cut) => {
                        c.clarity.admits(&cut.clarity)
                            && c.cut_quality.admits_opt(cut.cut_quality.as_deref())
                            && c.symmetry.admits_opt(cut.symmetry.as_deref())
                            && c.polish.admits_opt(cut.polish.as_deref())
                            && c.color_grade.admits_opt(cut.color_grade.as_deref())
                            && c.color_intensity.admits_opt(cut.color_intensity.as_deref())
                    }
                    GemstoneVariant::Rough(_) => false,
                }
            }
            FilterStage::RoughAttributes => {
                if c.crystal_quality.is_all() && c.transparency.is_all() {
                    return true;
                }
                match &gem.variant {
                    GemstoneVariant::Cut(_) => false,
                    GemstoneVariant::Rough(rough) => {
                        c.crystal_quality.admits(&rough.crystal_quality)
                            && c.transparency.admits_opt(rough.transparency.as_deref())
                    }
                }
            }
            FilterStage::Dimensions => {
                let dims = &gem.dimensions;
                c.dimensions_range.length.contains(dims.length)
                    && c.dimensions_range.width.contains(dims.width)
                    && c.dimensions_range.height.contains(dims.height)
            }
            FilterStage::Videos => !c.has_videos || gem.has_videos(),
            FilterStage::Certificates => !c.has_certificates || gem.has_certificate(),
            FilterStage::EstimatedYield => {
                if !self.yield_active {
                    return true;
                }
                match &gem.variant {
                    GemstoneVariant::Cut(_) => false,
                    GemstoneVariant::Rough(rough) => c
                        .estimated_yield_range
                        .contains(rough.estimated_carat_yield.unwrap_or(0.0)),
                }
            }
            FilterStage::InStock => !c.in_stock_only || gem.in_stock,
        }
    }
}

/// Filter a collection, deriving its domains from the collection itself.
pub fn apply_filters<'a>(items: &'a [Gemstone], criteria: &FilterCriteria) -> Vec<&'a Gemstone> {
    apply_filters_within(items, criteria, &derive_ranges(items))
}

/// Filter a collection against domains computed elsewhere, typically from
/// the full catalog the collection was drawn from.
pub fn apply_filters_within<'a>(
    items: &'a [Gemstone],
    criteria: &FilterCriteria,
    ranges: &DataRanges,
) -> Vec<&'a Gemstone> {
    apply_stages(items, criteria, ranges, &FilterStage::ALL)
}

/// Filter a collection with an explicit selection and order of stages.
pub fn apply_stages<'a>(
    items: &'a [Gemstone],
    criteria: &FilterCriteria,
    ranges: &DataRanges,
    stages: &[FilterStage],
) -> Vec<&'a Gemstone> {
    let matcher = CriteriaMatcher::new(criteria, ranges);
    items
        .iter()
        .filter(|gem| stages.iter().all(|&stage| matcher.admits(stage, gem)))
        .collect()
}

/// A gemstone collection with its derived domains.
///
/// Build a new engine whenever the collection changes; the cached domains are
/// never updated in place.
#[derive(Debug, Clone)]
pub struct FilterEngine<'a> {
    items: &'a [Gemstone],
    ranges: DataRanges,
    options: FilterOptions,
}

impl<'a> FilterEngine<'a> {
    pub fn new(items: &'a [Gemstone]) -> Self {
        Self {
            items,
            ranges: derive_ranges(items),
            options: derive_options(items),
        }
    }

    pub fn items(&self) -> &'a [Gemstone] {
        self.items
    }

    pub fn ranges(&self) -> &DataRanges {
        &self.ranges
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Criteria under which every item passes.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::defaults_for(&self.ranges)
    }

    pub fn apply(&self, criteria: &FilterCriteria) -> Vec<&'a Gemstone> {
        apply_filters_within(self.items, criteria, &self.ranges)
    }

    /// Filter, sort and paginate.
    pub fn search(&self, query: &SearchQuery) -> SearchResults<&'a Gemstone> {
        query.run(self.items, &self.ranges)
    }
}
