//! Gemstone catalog model and faceted search engine for GemVault.
//!
//! This crate provides:
//!
//! - **Catalog**: cut and rough gemstones, catalog loading and validation
//! - **Search**: filter domains, criteria, the filter engine, sorting,
//!   pagination and facet counts
//!
//! Everything here is pure: no I/O, no state kept between calls.
//!
//! # Example
//!
//! ```rust
//! use gem_catalog::prelude::*;
//!
//! let gems = vec![
//!     Gemstone::cut("g-1", "Blue Sapphire", "Sapphire", CutDetails::new(2.0, "VS1"))
//!         .with_price(1800.0),
//!     Gemstone::rough("g-2", "Ruby Crystal", "Ruby", RoughDetails::new(12.0, "AA"))
//!         .with_price(600.0),
//! ];
//!
//! let engine = FilterEngine::new(&gems);
//! let mut criteria = engine.default_criteria();
//! criteria.search_term = "sapphire".to_string();
//!
//! let matches = engine.apply(&criteria);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].id.as_str(), "g-1");
//! ```

pub mod error;
pub mod ids;

pub mod catalog;
pub mod search;

pub use error::CatalogError;
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::*;

    // Catalog
    pub use crate::catalog::{
        load_catalog_json, Certification, CutDetails, Dimensions, Gemstone, GemstoneKind,
        GemstoneVariant, RoughDetails, Treatment,
    };

    // Search
    pub use crate::search::{
        apply_filters, apply_filters_within, derive_options, derive_ranges, Bounds,
        CertificationChoice, Choice, DataRanges, FilterCriteria, FilterEngine, FilterOptions,
        FilterStage, Pagination, SavedSearch, SearchQuery, SearchResults, SortOption,
        TreatmentChoice,
    };
}
