//! Search results, pagination and facet counts.

use std::collections::BTreeMap;

use crate::catalog::Gemstone;
use crate::search::{CertificationChoice, FilterCriteria, TreatmentChoice};
use serde::{Deserialize, Serialize};

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total number of items.
    pub total: i64,
    /// Total number of pages.
    pub total_pages: i64,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total <= 0 {
            1
        } else {
            (total - 1) / per_page + 1
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Get page numbers for display (e.g., [3, 4, 5, 6, 7]).
    pub fn page_numbers(&self, max_visible: usize) -> Vec<i64> {
        if self.total_pages as usize <= max_visible {
            return (1..=self.total_pages).collect();
        }

        let half = max_visible / 2;
        let start = self.page.saturating_sub(half as i64).max(1);
        let end = start
            .saturating_add(max_visible as i64 - 1)
            .min(self.total_pages);
        let start = (end - max_visible as i64 + 1).max(1);

        (start..=end).collect()
    }

    /// Get start item number (1-indexed).
    pub fn start_item(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            self.page
                .saturating_sub(1)
                .saturating_mul(self.per_page)
                .saturating_add(1)
                .min(self.total)
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> i64 {
        self.page.saturating_mul(self.per_page).min(self.total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 24, 0)
    }
}

/// Search results container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults<T> {
    /// The result items on this page.
    pub items: Vec<T>,
    /// Pagination info.
    pub pagination: Pagination,
    /// Time spent searching, set by the caller.
    pub query_time_ms: i64,
    /// Facet counts over every match, not just this page.
    pub facets: Vec<Facet>,
}

impl<T> SearchResults<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            items,
            pagination,
            query_time_ms: 0,
            facets: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Pagination::default())
    }

    pub fn with_query_time(mut self, ms: i64) -> Self {
        self.query_time_ms = ms;
        self
    }

    pub fn with_facets(mut self, facets: Vec<Facet>) -> Self {
        self.facets = facets;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for SearchResults<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// A terms facet with per-value counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facet {
    /// Facet label (e.g., "Category").
    pub name: String,
    /// Criteria field this facet drives.
    pub field: String,
    pub values: Vec<FacetValue>,
}

impl Facet {
    pub fn terms(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            values: Vec::new(),
        }
    }

    pub fn add_value(&mut self, value: impl Into<String>, count: i64, selected: bool) {
        self.values.push(FacetValue {
            value: value.into(),
            count,
            selected,
        });
    }

    pub fn count_of(&self, value: &str) -> Option<i64> {
        self.values.iter().find(|v| v.value == value).map(|v| v.count)
    }
}

/// A single facet value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetValue {
    pub value: String,
    /// Number of matched items with this value.
    pub count: i64,
    /// Whether the current criteria select this value.
    pub selected: bool,
}

fn build_facet<'g>(
    name: &str,
    field: &str,
    items: &[&'g Gemstone],
    value_of: impl Fn(&'g Gemstone) -> Option<&'g str>,
    selected: Option<&str>,
) -> Facet {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for gem in items {
        if let Some(value) = value_of(*gem).filter(|v| !v.is_empty()) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut values: Vec<(&str, i64)> = counts.into_iter().collect();
    // most common first; ties stay alphabetical
    values.sort_by(|a, b| b.1.cmp(&a.1));

    let mut facet = Facet::terms(name, field);
    for (value, count) in values {
        facet.add_value(value, count, selected == Some(value));
    }
    facet
}

/// Count matched items per value of each categorical facet.
pub fn facet_counts(items: &[&Gemstone], criteria: &FilterCriteria) -> Vec<Facet> {
    let treatment = match &criteria.treatment {
        TreatmentChoice::All => None,
        TreatmentChoice::Untreated => Some(crate::catalog::UNTREATED),
        TreatmentChoice::Type(t) => Some(t.as_str()),
    };
    let lab = match &criteria.certification {
        CertificationChoice::Lab(lab) => Some(lab.as_str()),
        _ => None,
    };

    vec![
        build_facet(
            "Category",
            "category",
            items,
            |g| Some(g.category.as_str()),
            criteria.category.value(),
        ),
        build_facet(
            "Origin",
            "origin",
            items,
            |g| Some(g.origin.as_str()),
            criteria.origin.value(),
        ),
        build_facet(
            "Type",
            "type",
            items,
            |g| Some(g.kind().as_str()),
            criteria.kind.value(),
        ),
        build_facet(
            "Color",
            "color",
            items,
            |g| g.color.as_deref(),
            criteria.color.value(),
        ),
        build_facet(
            "Treatment",
            "treatment",
            items,
            Gemstone::treatment_label,
            treatment,
        ),
        build_facet(
            "Certification Lab",
            "certification",
            items,
            |g| {
                g.certification
                    .certified
                    .then_some(g.certification.lab.as_deref())
                    .flatten()
            },
            lab,
        ),
    ]
}
