//! Catalog ingestion.
//!
//! The filter engine trusts its input; records are checked here, once, when a
//! catalog is loaded from the data-access layer.

use std::collections::HashSet;

use crate::catalog::Gemstone;
use crate::error::CatalogError;

/// Parse a JSON array of gemstones and validate every record.
pub fn load_catalog_json(json: &str) -> Result<Vec<Gemstone>, CatalogError> {
    let gemstones: Vec<Gemstone> = serde_json::from_str(json)?;
    validate_catalog(&gemstones)?;
    Ok(gemstones)
}

/// Validate each gemstone and reject duplicate ids.
pub fn validate_catalog(gemstones: &[Gemstone]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(gemstones.len());
    for gem in gemstones {
        gem.validate()?;
        if !seen.insert(gem.id.as_str()) {
            return Err(CatalogError::DuplicateId(gem.id.to_string()));
        }
    }
    Ok(())
}
