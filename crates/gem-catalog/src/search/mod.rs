//! Search module.
//!
//! Faceted filtering over a gemstone collection: domain derivation, criteria,
//! the filter engine, sorting, pagination and facet counts.

mod criteria;
mod domain;
mod filter;
mod query;
mod results;

pub use criteria::{
    ActiveFilter, Bounds, CertificationChoice, Choice, DimensionsRange, FilterCriteria,
    SavedSearch, TreatmentChoice, ALL,
};
pub use domain::{derive_options, derive_ranges, DataRanges, FilterOptions};
pub use filter::{
    apply_filters, apply_filters_within, apply_stages, CriteriaMatcher, FilterEngine, FilterStage,
};
pub use query::{SearchQuery, SortOption};
pub use results::{facet_counts, Facet, FacetValue, Pagination, SearchResults};
