//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while loading a catalog or validating criteria.
///
/// The filter engine itself is total and never produces these; they come from
/// ingestion and from checking caller-supplied criteria before use.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two gemstones share the same id.
    #[error("Duplicate gemstone id: {0}")]
    DuplicateId(String),

    /// A gemstone record failed validation.
    #[error("Invalid gemstone {id}: {reason}")]
    InvalidGemstone { id: String, reason: String },

    /// A range criterion is malformed.
    #[error("Invalid range for {field}: [{min}, {max}]")]
    InvalidRange { field: String, min: f64, max: f64 },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CatalogError::InvalidRange {
            field: "priceRange".to_string(),
            min: 10.0,
            max: 5.0,
        };
        assert_eq!(err.to_string(), "Invalid range for priceRange: [10, 5]");

        let err = CatalogError::DuplicateId("gem-1".to_string());
        assert_eq!(err.to_string(), "Duplicate gemstone id: gem-1");
    }

    #[test]
    fn test_from_serde_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: CatalogError = parse.unwrap_err().into();
        assert!(matches!(err, CatalogError::SerializationError(_)));
    }
}
