//! Search query: criteria plus sort order and pagination.

use std::cmp::Ordering;

use crate::catalog::Gemstone;
use crate::search::{
    apply_filters_within, facet_counts, DataRanges, FilterCriteria, Pagination, SearchResults,
};
use serde::{Deserialize, Serialize};

/// Sort options for the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    WeightAsc,
    WeightDesc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Featured => "featured",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::NameAsc => "name_asc",
            SortOption::NameDesc => "name_desc",
            SortOption::WeightAsc => "weight_asc",
            SortOption::WeightDesc => "weight_desc",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "featured" => Some(SortOption::Featured),
            "price_asc" => Some(SortOption::PriceAsc),
            "price_desc" => Some(SortOption::PriceDesc),
            "name_asc" => Some(SortOption::NameAsc),
            "name_desc" => Some(SortOption::NameDesc),
            "weight_asc" => Some(SortOption::WeightAsc),
            "weight_desc" => Some(SortOption::WeightDesc),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Featured",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
            SortOption::WeightAsc => "Weight: Light to Heavy",
            SortOption::WeightDesc => "Weight: Heavy to Light",
        }
    }

    fn compare(&self, a: &Gemstone, b: &Gemstone) -> Ordering {
        match self {
            SortOption::Featured => Ordering::Equal,
            SortOption::PriceAsc => a.price.total_cmp(&b.price),
            SortOption::PriceDesc => b.price.total_cmp(&a.price),
            SortOption::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOption::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
            SortOption::WeightAsc => a.weight().total_cmp(&b.weight()),
            SortOption::WeightDesc => b.weight().total_cmp(&a.weight()),
        }
    }

    /// Stable sort; ties keep their catalog order.
    pub fn sort(&self, items: &mut [&Gemstone]) {
        if *self != SortOption::Featured {
            items.sort_by(|a, b| self.compare(a, b));
        }
    }
}

/// A search request from the product grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub criteria: FilterCriteria,
    pub sort: SortOption,
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

impl SearchQuery {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            sort: SortOption::Featured,
            page: 1,
            per_page: 24,
        }
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_pagination(mut self, page: i64, per_page: i64) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, 100);
        self
    }

    /// Index of the first item on the current page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Filter, sort, paginate, and count facets over the whole match set.
    pub fn run<'a>(
        &self,
        items: &'a [Gemstone],
        ranges: &DataRanges,
    ) -> SearchResults<&'a Gemstone> {
        let mut matched = apply_filters_within(items, &self.criteria, ranges);
        self.sort.sort(&mut matched);

        let facets = facet_counts(&matched, &self.criteria);
        let pagination = Pagination::new(self.page, self.per_page, matched.len() as i64);

        let start = usize::try_from(self.offset().max(0))
            .unwrap_or(usize::MAX)
            .min(matched.len());
        let len = usize::try_from(self.per_page.max(1)).unwrap_or(usize::MAX);
        let end = start.saturating_add(len).min(matched.len());
        let page = matched[start..end].to_vec();

        SearchResults::new(page, pagination).with_facets(facets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CutDetails, RoughDetails};
    use crate::search::{derive_ranges, Choice};

    fn catalog() -> Vec<Gemstone> {
        vec![
            Gemstone::cut("a", "emerald step", "Emerald", CutDetails::new(2.0, "VS2"))
                .with_price(3000.0),
            Gemstone::cut("b", "Alexandrite", "Chrysoberyl", CutDetails::new(1.0, "VVS1"))
                .with_price(7000.0),
            Gemstone::rough("c", "Beryl Rough", "Emerald", RoughDetails::new(30.0, "A"))
                .with_price(3000.0),
            Gemstone::cut("d", "Citrine", "Quartz", CutDetails::new(5.0, "IF")).with_price(90.0),
        ]
    }

    fn ids(results: &SearchResults<&Gemstone>) -> Vec<String> {
        results.items.iter().map(|g| g.id.to_string()).collect()
    }

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::default()
            .with_sort(SortOption::PriceAsc)
            .with_pagination(2, 10);

        assert_eq!(query.page, 2);
        assert_eq!(query.per_page, 10);
        assert_eq!(query.offset(), 10);

        let clamped = SearchQuery::default().with_pagination(0, 1000);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, 100);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let items = catalog();
        let ranges = derive_ranges(&items);

        let results = SearchQuery::default()
            .with_pagination(i64::MAX, 24)
            .run(&items, &ranges);

        assert!(results.is_empty());
        assert_eq!(results.pagination.total, 4);
        assert_eq!(results.pagination.total_pages, 1);
        assert!(!results.pagination.has_next);
        assert_eq!(results.pagination.end_item(), 4);

        let query = SearchQuery::default().with_pagination(i64::MAX, 100);
        assert_eq!(query.offset(), i64::MAX);
        let results = SearchQuery::default().with_pagination(3, 2).run(&items, &ranges);
        assert!(results.is_empty());
        assert_eq!(results.pagination.total_pages, 2);
    }

    #[test]
    fn test_sort_option_parsing() {
        for option in [
            SortOption::Featured,
            SortOption::PriceAsc,
            SortOption::PriceDesc,
            SortOption::NameAsc,
            SortOption::NameDesc,
            SortOption::WeightAsc,
            SortOption::WeightDesc,
        ] {
            assert_eq!(SortOption::from_str(option.as_str()), Some(option));
        }
        assert_eq!(SortOption::from_str("rating"), None);
    }

    #[test]
    fn test_sort_is_stable() {
        let items = catalog();
        let ranges = derive_ranges(&items);

        let results = SearchQuery::default()
            .with_sort(SortOption::PriceAsc)
            .run(&items, &ranges);
        assert_eq!(ids(&results), vec!["d", "a", "c", "b"]);

        let results = SearchQuery::default()
            .with_sort(SortOption::PriceDesc)
            .run(&items, &ranges);
        assert_eq!(ids(&results), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let items = catalog();
        let results = SearchQuery::default()
            .with_sort(SortOption::NameAsc)
            .run(&items, &derive_ranges(&items));
        assert_eq!(ids(&results), vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_sort_by_weight() {
        let items = catalog();
        let results = SearchQuery::default()
            .with_sort(SortOption::WeightDesc)
            .run(&items, &derive_ranges(&items));
        assert_eq!(ids(&results), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_pagination_slices_results() {
        let items = catalog();
        let ranges = derive_ranges(&items);

        let page2 = SearchQuery::default()
            .with_pagination(2, 3)
            .run(&items, &ranges);
        assert_eq!(ids(&page2), vec!["d"]);
        assert_eq!(page2.pagination.total, 4);
        assert_eq!(page2.pagination.total_pages, 2);

        let beyond = SearchQuery::default()
            .with_pagination(9, 3)
            .run(&items, &ranges);
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_facets_cover_all_matches() {
        let items = catalog();
        let mut criteria = FilterCriteria::default();
        criteria.category = Choice::only("Emerald");

        let results = SearchQuery::new(criteria)
            .with_pagination(1, 1)
            .run(&items, &derive_ranges(&items));
        assert_eq!(results.len(), 1);

        let category = results.facets.iter().find(|f| f.field == "category").unwrap();
        assert_eq!(category.values.len(), 1);
        assert_eq!(category.values[0].count, 2);
        assert!(category.values[0].selected);
    }
}
