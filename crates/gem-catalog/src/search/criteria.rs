//! Filter criteria.
//!
//! Criteria are plain data owned by the caller. Every categorical selector
//! serializes as a string with `"all"` meaning "no constraint", and every
//! range serializes as a `[min, max]` array, so saved searches stay readable
//! by older storefront builds.

use std::fmt;

use crate::error::CatalogError;
use crate::ids::SavedSearchId;
use crate::search::DataRanges;
use serde::{Deserialize, Serialize};

/// Wire sentinel for an unconstrained selector.
pub const ALL: &str = "all";

/// A categorical selector: either unconstrained or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn only(value: impl Into<String>) -> Self {
        Choice::from(value.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    /// The selected value, if constrained.
    pub fn value(&self) -> Option<&str> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v),
        }
    }

    /// Whether a present field value satisfies this selector.
    pub fn admits(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(v) => v == value,
        }
    }

    /// Whether an optional field value satisfies this selector.
    ///
    /// An absent value only satisfies [`Choice::All`].
    pub fn admits_opt(&self, value: Option<&str>) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(v) => value == Some(v.as_str()),
        }
    }
}

impl From<String> for Choice {
    fn from(s: String) -> Self {
        if s.is_empty() || s == ALL {
            Choice::All
        } else {
            Choice::Only(s)
        }
    }
}

impl From<&str> for Choice {
    fn from(s: &str) -> Self {
        Choice::from(s.to_string())
    }
}

impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::All => ALL.to_string(),
            Choice::Only(v) => v,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value().unwrap_or(ALL))
    }
}

/// Treatment selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TreatmentChoice {
    #[default]
    All,
    /// Only stones that were never treated.
    Untreated,
    /// Only stones treated with this method.
    Type(String),
}

impl From<String> for TreatmentChoice {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" | ALL => TreatmentChoice::All,
            crate::catalog::UNTREATED => TreatmentChoice::Untreated,
            _ => TreatmentChoice::Type(s),
        }
    }
}

impl From<&str> for TreatmentChoice {
    fn from(s: &str) -> Self {
        TreatmentChoice::from(s.to_string())
    }
}

impl From<TreatmentChoice> for String {
    fn from(choice: TreatmentChoice) -> Self {
        match choice {
            TreatmentChoice::All => ALL.to_string(),
            TreatmentChoice::Untreated => crate::catalog::UNTREATED.to_string(),
            TreatmentChoice::Type(t) => t,
        }
    }
}

impl fmt::Display for TreatmentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self.clone()))
    }
}

/// Certification selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CertificationChoice {
    #[default]
    All,
    /// Any certified stone.
    Certified,
    /// Only uncertified stones.
    Uncertified,
    /// Stones certified by this lab.
    Lab(String),
}

impl From<String> for CertificationChoice {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" | ALL => CertificationChoice::All,
            "certified" => CertificationChoice::Certified,
            "uncertified" => CertificationChoice::Uncertified,
            _ => CertificationChoice::Lab(s),
        }
    }
}

impl From<&str> for CertificationChoice {
    fn from(s: &str) -> Self {
        CertificationChoice::from(s.to_string())
    }
}

impl From<CertificationChoice> for String {
    fn from(choice: CertificationChoice) -> Self {
        match choice {
            CertificationChoice::All => ALL.to_string(),
            CertificationChoice::Certified => "certified".to_string(),
            CertificationChoice::Uncertified => "uncertified".to_string(),
            CertificationChoice::Lab(lab) => lab,
        }
    }
}

impl fmt::Display for CertificationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self.clone()))
    }
}

/// An inclusive numeric range, `[min, max]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// A range no finite value falls outside of.
    pub const UNBOUNDED: Bounds = Bounds {
        min: 0.0,
        max: f64::MAX,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The range `[0, max]`.
    pub fn up_to(max: f64) -> Self {
        Self { min: 0.0, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Whether this range excludes part of `[0, max]`.
    pub fn is_narrower_than(&self, max: f64) -> bool {
        self.min > 0.0 || self.max < max
    }

    /// Whether `min <= max` with both ends being numbers.
    pub fn is_well_formed(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan() && self.min <= self.max
    }

    /// Shrink the range so it lies within `[0, limit]`.
    pub fn clamp_to(&self, limit: f64) -> Self {
        let max = self.max.min(limit).max(0.0);
        let min = self.min.max(0.0).min(max);
        Self { min, max }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::UNBOUNDED
    }
}

impl From<[f64; 2]> for Bounds {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<Bounds> for [f64; 2] {
    fn from(b: Bounds) -> Self {
        [b.min, b.max]
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Per-axis dimension ranges in millimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionsRange {
    pub length: Bounds,
    pub width: Bounds,
    pub height: Bounds,
}

/// The full set of constraints a shopper has chosen.
///
/// Every field is independent. Missing fields in a JSON document fall back to
/// their unconstrained value, so partial documents load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search_term: String,
    pub category: Choice,
    pub origin: Choice,
    /// Gemstone kind, `"cut"` or `"rough"`.
    #[serde(rename = "type")]
    pub kind: Choice,
    pub color: Choice,
    pub treatment: TreatmentChoice,
    pub certification: CertificationChoice,
    pub price_range: Bounds,
    pub weight_range: Bounds,
    pub dimensions_range: DimensionsRange,
    pub estimated_yield_range: Bounds,

    // Cut-only
    pub clarity: Choice,
    pub cut_quality: Choice,
    pub symmetry: Choice,
    pub polish: Choice,
    pub color_grade: Choice,
    pub color_intensity: Choice,

    // Rough-only
    pub crystal_quality: Choice,
    pub transparency: Choice,

    pub in_stock_only: bool,
    pub has_videos: bool,
    pub has_certificates: bool,
}

/// A criteria field that currently narrows the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    /// JSON field name of the criterion.
    pub field: &'static str,
    /// Human-readable value.
    pub value: String,
}

impl FilterCriteria {
    /// Criteria that admit every item of a collection with these ranges.
    pub fn defaults_for(ranges: &DataRanges) -> Self {
        Self {
            price_range: Bounds::up_to(ranges.max_price),
            weight_range: Bounds::up_to(ranges.max_weight),
            dimensions_range: DimensionsRange {
                length: Bounds::up_to(ranges.max_length),
                width: Bounds::up_to(ranges.max_width),
                height: Bounds::up_to(ranges.max_height),
            },
            estimated_yield_range: Bounds::up_to(ranges.max_yield),
            ..Self::default()
        }
    }

    /// Trimmed search term, or `None` if blank.
    pub fn search_text(&self) -> Option<&str> {
        let term = self.search_term.trim();
        (!term.is_empty()).then_some(term)
    }

    /// Named range criteria, in wire-name form.
    pub fn ranges(&self) -> [(&'static str, Bounds); 6] {
        [
            ("priceRange", self.price_range),
            ("weightRange", self.weight_range),
            ("dimensionsRange.length", self.dimensions_range.length),
            ("dimensionsRange.width", self.dimensions_range.width),
            ("dimensionsRange.height", self.dimensions_range.height),
            ("estimatedYieldRange", self.estimated_yield_range),
        ]
    }

    /// Named categorical selectors that use the plain [`Choice`] type.
    pub fn choices(&self) -> [(&'static str, &Choice); 12] {
        [
            ("category", &self.category),
            ("origin", &self.origin),
            ("type", &self.kind),
            ("color", &self.color),
            ("clarity", &self.clarity),
            ("cutQuality", &self.cut_quality),
            ("symmetry", &self.symmetry),
            ("polish", &self.polish),
            ("colorGrade", &self.color_grade),
            ("colorIntensity", &self.color_intensity),
            ("crystalQuality", &self.crystal_quality),
            ("transparency", &self.transparency),
        ]
    }

    /// Reject ranges with `min > max` or NaN ends.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (field, bounds) in self.ranges() {
            if !bounds.is_well_formed() {
                return Err(CatalogError::InvalidRange {
                    field: field.to_string(),
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(())
    }

    /// List the criteria that narrow a collection with these ranges.
    ///
    /// A range counts as active only when it excludes part of `[0, max]`.
    pub fn active_filters(&self, ranges: &DataRanges) -> Vec<ActiveFilter> {
        let mut active = Vec::new();

        if let Some(term) = self.search_text() {
            active.push(ActiveFilter {
                field: "searchTerm",
                value: term.to_string(),
            });
        }

        for (field, choice) in self.choices() {
            if let Some(value) = choice.value() {
                active.push(ActiveFilter {
                    field,
                    value: value.to_string(),
                });
            }
        }
        if self.treatment != TreatmentChoice::All {
            active.push(ActiveFilter {
                field: "treatment",
                value: self.treatment.to_string(),
            });
        }
        if self.certification != CertificationChoice::All {
            active.push(ActiveFilter {
                field: "certification",
                value: self.certification.to_string(),
            });
        }

        let limits = [
            ranges.max_price,
            ranges.max_weight,
            ranges.max_length,
            ranges.max_width,
            ranges.max_height,
            ranges.max_yield,
        ];
        for ((field, bounds), limit) in self.ranges().into_iter().zip(limits) {
            if bounds.is_narrower_than(limit) {
                active.push(ActiveFilter {
                    field,
                    value: bounds.to_string(),
                });
            }
        }

        for (field, on) in [
            ("inStockOnly", self.in_stock_only),
            ("hasVideos", self.has_videos),
            ("hasCertificates", self.has_certificates),
        ] {
            if on {
                active.push(ActiveFilter {
                    field,
                    value: "true".to_string(),
                });
            }
        }

        active
    }

    /// Fit every range inside the domain of a (possibly new) collection.
    pub fn clamp_to(&self, ranges: &DataRanges) -> Self {
        let mut clamped = self.clone();
        clamped.price_range = self.price_range.clamp_to(ranges.max_price);
        clamped.weight_range = self.weight_range.clamp_to(ranges.max_weight);
        clamped.dimensions_range = DimensionsRange {
            length: self.dimensions_range.length.clamp_to(ranges.max_length),
            width: self.dimensions_range.width.clamp_to(ranges.max_width),
            height: self.dimensions_range.height.clamp_to(ranges.max_height),
        };
        clamped.estimated_yield_range = self.estimated_yield_range.clamp_to(ranges.max_yield);
        clamped
    }
}

/// A named criteria snapshot kept for later reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: SavedSearchId,
    pub name: String,
    pub criteria: FilterCriteria,
    /// Unix timestamp (seconds) of when the search was saved.
    pub saved_at: i64,
}

impl SavedSearch {
    pub fn new(name: impl Into<String>, criteria: FilterCriteria, saved_at: i64) -> Self {
        Self {
            id: SavedSearchId::generate(),
            name: name.into(),
            criteria,
            saved_at,
        }
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let saved: SavedSearch = serde_json::from_str(json)?;
        saved.criteria.validate()?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> DataRanges {
        DataRanges {
            max_price: 5000.0,
            max_weight: 20.0,
            max_length: 30.0,
            max_width: 20.0,
            max_height: 15.0,
            max_yield: 8.0,
        }
    }

    #[test]
    fn test_choice_sentinel() {
        assert_eq!(Choice::from("all"), Choice::All);
        assert_eq!(Choice::from(""), Choice::All);
        assert_eq!(Choice::only("Ruby"), Choice::Only("Ruby".to_string()));
        assert!(Choice::All.admits("anything"));
        assert!(Choice::All.admits_opt(None));
        assert!(!Choice::only("Blue").admits_opt(None));
        assert!(Choice::only("Blue").admits("Blue"));
        assert!(!Choice::only("Blue").admits("blue"));
    }

    #[test]
    fn test_special_selectors_parse() {
        assert_eq!(TreatmentChoice::from("untreated"), TreatmentChoice::Untreated);
        assert_eq!(
            TreatmentChoice::from("heated"),
            TreatmentChoice::Type("heated".to_string())
        );
        assert_eq!(CertificationChoice::from("certified"), CertificationChoice::Certified);
        assert_eq!(
            CertificationChoice::from("uncertified"),
            CertificationChoice::Uncertified
        );
        assert_eq!(
            CertificationChoice::from("GIA"),
            CertificationChoice::Lab("GIA".to_string())
        );
        assert_eq!(CertificationChoice::Lab("GIA".to_string()).to_string(), "GIA");
    }

    #[test]
    fn test_wire_format() {
        let mut criteria = FilterCriteria::defaults_for(&ranges());
        criteria.category = Choice::only("Sapphire");
        criteria.treatment = TreatmentChoice::Untreated;

        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["category"], "Sapphire");
        assert_eq!(json["origin"], "all");
        assert_eq!(json["type"], "all");
        assert_eq!(json["treatment"], "untreated");
        assert_eq!(json["priceRange"], serde_json::json!([0.0, 5000.0]));
        assert_eq!(json["dimensionsRange"]["height"], serde_json::json!([0.0, 15.0]));
        assert_eq!(json["inStockOnly"], false);
    }

    #[test]
    fn test_partial_document_loads() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"searchTerm": "blue", "priceRange": [100, 1000]}"#).unwrap();
        assert_eq!(criteria.search_term, "blue");
        assert_eq!(criteria.price_range, Bounds::new(100.0, 1000.0));
        assert_eq!(criteria.weight_range, Bounds::UNBOUNDED);
        assert!(criteria.clarity.is_all());
    }

    #[test]
    fn test_unbounded_round_trips() {
        let criteria = FilterCriteria::default();
        let json = serde_json::to_string(&criteria).unwrap();
        let back: FilterCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back, criteria);
    }

    #[test]
    fn test_bounds() {
        let b = Bounds::new(100.0, 1000.0);
        assert!(b.contains(100.0));
        assert!(b.contains(1000.0));
        assert!(!b.contains(99.99));
        assert!(b.is_narrower_than(5000.0));
        assert!(!Bounds::up_to(8.0).is_narrower_than(8.0));
        assert!(Bounds::up_to(7.0).is_narrower_than(8.0));
        assert!(!Bounds::new(5.0, 1.0).is_well_formed());
        assert!(!Bounds::new(f64::NAN, 1.0).is_well_formed());
    }

    #[test]
    fn test_bounds_clamp() {
        assert_eq!(Bounds::new(10.0, 900.0).clamp_to(500.0), Bounds::new(10.0, 500.0));
        assert_eq!(Bounds::new(700.0, 900.0).clamp_to(500.0), Bounds::new(500.0, 500.0));
        assert_eq!(Bounds::UNBOUNDED.clamp_to(42.0), Bounds::up_to(42.0));
    }

    #[test]
    fn test_criteria_clamp() {
        let criteria = FilterCriteria {
            category: Choice::only("Spinel"),
            weight_range: Bounds::new(2.0, 50.0),
            ..FilterCriteria::default()
        };
        let clamped = criteria.clamp_to(&ranges());

        assert_eq!(clamped.category, Choice::only("Spinel"));
        assert_eq!(clamped.weight_range, Bounds::new(2.0, 20.0));
        assert_eq!(clamped.price_range, Bounds::up_to(5000.0));
        assert_eq!(clamped.dimensions_range.height, Bounds::up_to(15.0));
        assert_eq!(clamped.estimated_yield_range, Bounds::up_to(8.0));
        assert_eq!(clamped.clamp_to(&ranges()), clamped);
    }

    #[test]
    fn test_validate() {
        let mut criteria = FilterCriteria::defaults_for(&ranges());
        assert!(criteria.validate().is_ok());

        criteria.dimensions_range.width = Bounds::new(10.0, 2.0);
        let err = criteria.validate().unwrap_err();
        assert!(
            matches!(err, CatalogError::InvalidRange { ref field, .. } if field == "dimensionsRange.width")
        );
    }

    #[test]
    fn test_active_filters() {
        let ranges = ranges();
        let mut criteria = FilterCriteria::defaults_for(&ranges);
        assert!(criteria.active_filters(&ranges).is_empty());

        criteria.search_term = "  blue ".to_string();
        criteria.clarity = Choice::only("VS1");
        criteria.certification = CertificationChoice::Certified;
        criteria.price_range = Bounds::new(100.0, 5000.0);
        criteria.has_videos = true;

        let fields: Vec<_> = criteria
            .active_filters(&ranges)
            .into_iter()
            .map(|f| f.field)
            .collect();
        assert_eq!(
            fields,
            vec!["searchTerm", "clarity", "certification", "priceRange", "hasVideos"]
        );
    }

    #[test]
    fn test_saved_search_round_trip() {
        let mut criteria = FilterCriteria::defaults_for(&ranges());
        criteria.crystal_quality = Choice::only("AAA");
        let saved = SavedSearch::new("rough AAA", criteria, 1_760_000_000);

        let json = saved.to_json().unwrap();
        assert!(json.contains("\"savedAt\""));
        let back = SavedSearch::from_json(&json).unwrap();
        assert_eq!(back, saved);
    }

    #[test]
    fn test_saved_search_rejects_bad_range() {
        let json = r#"{"id": "s-1", "name": "x", "savedAt": 0, "criteria": {"priceRange": [9, 1]}}"#;
        assert!(SavedSearch::from_json(json).is_err());
    }
}
