//! Gemstone types.
//!
//! A gemstone is either cut (faceted, weighed in carats) or rough (an
//! unprocessed specimen, weighed in grams). The two variants carry disjoint
//! grading attributes, so every read of a variant-specific field goes through
//! an exhaustive `match` on [`GemstoneVariant`].

use crate::error::CatalogError;
use crate::ids::GemstoneId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Treatment label used for stones that were never treated.
pub const UNTREATED: &str = "untreated";

/// Discriminant of a gemstone variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemstoneKind {
    Cut,
    Rough,
}

impl GemstoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GemstoneKind::Cut => "cut",
            GemstoneKind::Rough => "rough",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cut" => Some(GemstoneKind::Cut),
            "rough" => Some(GemstoneKind::Rough),
            _ => None,
        }
    }

    /// Name of the weight unit for this kind.
    pub fn weight_unit(&self) -> &'static str {
        match self {
            GemstoneKind::Cut => "ct",
            GemstoneKind::Rough => "g",
        }
    }
}

impl fmt::Display for GemstoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical size in millimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }
}

/// Treatment history of a stone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub treated: bool,
    /// Treatment type, e.g. "heated" or "oiled".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub treatment_type: Option<String>,
}

impl Treatment {
    pub fn untreated() -> Self {
        Self::default()
    }

    pub fn treated(treatment_type: impl Into<String>) -> Self {
        Self {
            treated: true,
            treatment_type: Some(treatment_type.into()),
        }
    }
}

/// Lab certification of a stone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub certified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_url: Option<String>,
}

impl Certification {
    pub fn uncertified() -> Self {
        Self::default()
    }

    pub fn by_lab(lab: impl Into<String>) -> Self {
        Self {
            certified: true,
            lab: Some(lab.into()),
            certificate_url: None,
        }
    }

    pub fn with_certificate_url(mut self, url: impl Into<String>) -> Self {
        self.certificate_url = Some(url.into());
        self
    }
}

/// Grading attributes of a cut stone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutDetails {
    pub carat_weight: f64,
    pub clarity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut_quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_intensity: Option<String>,
}

impl CutDetails {
    pub fn new(carat_weight: f64, clarity: impl Into<String>) -> Self {
        Self {
            carat_weight,
            clarity: clarity.into(),
            cut_quality: None,
            symmetry: None,
            polish: None,
            color_grade: None,
            color_intensity: None,
        }
    }
}

/// Attributes of a rough specimen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoughDetails {
    pub gram_weight: f64,
    pub crystal_quality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_carat_yield: Option<f64>,
}

impl RoughDetails {
    pub fn new(gram_weight: f64, crystal_quality: impl Into<String>) -> Self {
        Self {
            gram_weight,
            crystal_quality: crystal_quality.into(),
            transparency: None,
            estimated_carat_yield: None,
        }
    }
}

/// Variant-specific part of a gemstone, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GemstoneVariant {
    Cut(CutDetails),
    Rough(RoughDetails),
}

/// A gemstone listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gemstone {
    /// Unique gemstone identifier.
    pub id: GemstoneId,
    /// Display name.
    pub name: String,
    /// Category, e.g. "Sapphire".
    pub category: String,
    /// Mining origin, e.g. "Sri Lanka".
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Price as a plain decimal.
    pub price: f64,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub treatment: Treatment,
    #[serde(default)]
    pub certification: Certification,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub variant: GemstoneVariant,
}

impl Gemstone {
    /// Create a gemstone with empty optional attributes.
    pub fn new(
        id: impl Into<GemstoneId>,
        name: impl Into<String>,
        category: impl Into<String>,
        variant: GemstoneVariant,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            origin: String::new(),
            color: None,
            price: 0.0,
            dimensions: Dimensions::default(),
            treatment: Treatment::default(),
            certification: Certification::default(),
            in_stock: true,
            videos: None,
            description: None,
            variant,
        }
    }

    /// Create a cut gemstone.
    pub fn cut(
        id: impl Into<GemstoneId>,
        name: impl Into<String>,
        category: impl Into<String>,
        details: CutDetails,
    ) -> Self {
        Self::new(id, name, category, GemstoneVariant::Cut(details))
    }

    /// Create a rough gemstone.
    pub fn rough(
        id: impl Into<GemstoneId>,
        name: impl Into<String>,
        category: impl Into<String>,
        details: RoughDetails,
    ) -> Self {
        Self::new(id, name, category, GemstoneVariant::Rough(details))
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_treatment(mut self, treatment: Treatment) -> Self {
        self.treatment = treatment;
        self
    }

    pub fn with_certification(mut self, certification: Certification) -> Self {
        self.certification = certification;
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn with_videos(mut self, videos: Vec<String>) -> Self {
        self.videos = Some(videos);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kind(&self) -> GemstoneKind {
        match self.variant {
            GemstoneVariant::Cut(_) => GemstoneKind::Cut,
            GemstoneVariant::Rough(_) => GemstoneKind::Rough,
        }
    }

    /// Weight in the variant's own unit: carats for cut, grams for rough.
    pub fn weight(&self) -> f64 {
        match &self.variant {
            GemstoneVariant::Cut(cut) => cut.carat_weight,
            GemstoneVariant::Rough(rough) => rough.gram_weight,
        }
    }

    /// Estimated carat yield; `None` for cut stones.
    ///
    /// A rough specimen without an estimate yields `0`.
    pub fn estimated_yield(&self) -> Option<f64> {
        match &self.variant {
            GemstoneVariant::Cut(_) => None,
            GemstoneVariant::Rough(rough) => Some(rough.estimated_carat_yield.unwrap_or(0.0)),
        }
    }

    pub fn as_cut(&self) -> Option<&CutDetails> {
        match &self.variant {
            GemstoneVariant::Cut(cut) => Some(cut),
            GemstoneVariant::Rough(_) => None,
        }
    }

    pub fn as_rough(&self) -> Option<&RoughDetails> {
        match &self.variant {
            GemstoneVariant::Cut(_) => None,
            GemstoneVariant::Rough(rough) => Some(rough),
        }
    }

    /// Whether at least one video is attached.
    pub fn has_videos(&self) -> bool {
        self.videos.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Whether the stone is certified and links to its certificate.
    pub fn has_certificate(&self) -> bool {
        self.certification.certified
            && self
                .certification
                .certificate_url
                .as_deref()
                .is_some_and(|url| !url.is_empty())
    }

    /// Label used for the treatment facet.
    ///
    /// Untreated stones report [`UNTREATED`]; treated stones report their type,
    /// or `None` when the type is unknown.
    pub fn treatment_label(&self) -> Option<&str> {
        if !self.treatment.treated {
            return Some(UNTREATED);
        }
        self.treatment
            .treatment_type
            .as_deref()
            .filter(|t| !t.is_empty())
    }

    /// Check the invariants a listed gemstone must hold.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidGemstone {
            id: self.id.to_string(),
            reason: reason.to_string(),
        };

        if self.id.is_blank() {
            return Err(invalid("id must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if !is_non_negative(self.price) {
            return Err(invalid("price must be a non-negative number"));
        }
        let Dimensions {
            length,
            width,
            height,
        } = self.dimensions;
        if ![length, width, height].into_iter().all(is_non_negative) {
            return Err(invalid("dimensions must be non-negative numbers"));
        }
        let weight = self.weight();
        if !(weight.is_finite() && weight > 0.0) {
            return Err(invalid("weight must be a positive number"));
        }
        if let GemstoneVariant::Rough(rough) = &self.variant {
            if let Some(yield_ct) = rough.estimated_carat_yield {
                if !is_non_negative(yield_ct) {
                    return Err(invalid("estimated carat yield must be non-negative"));
                }
            }
        }
        Ok(())
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
