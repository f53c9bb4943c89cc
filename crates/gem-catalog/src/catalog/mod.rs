//! Gemstone catalog module.
//!
//! Contains the polymorphic gemstone model and catalog ingestion.

mod gemstone;
mod load;

pub use gemstone::{
    Certification, CutDetails, Dimensions, Gemstone, GemstoneKind, GemstoneVariant, RoughDetails,
    Treatment, UNTREATED,
};
pub use load::{load_catalog_json, validate_catalog};
