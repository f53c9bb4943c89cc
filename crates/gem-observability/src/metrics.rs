//! Per-search timing metrics.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::SearchId;

/// Metrics for one search session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMetrics {
    pub search_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Items in the catalog.
    pub catalog_size: usize,
    /// Items that passed every filter.
    pub matched: usize,
    /// Items on the returned page.
    pub returned: usize,
    /// Phases in the order they started.
    pub phases: Vec<PhaseMetrics>,
    pub total_duration_us: u64,
}

/// Timing of one phase (load, derive, filter, sort, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseMetrics {
    pub name: String,
    /// Time from session start to phase start (microseconds).
    pub start_us: u64,
    pub duration_us: u64,
}

#[derive(Debug)]
struct PhaseBuilder {
    name: String,
    start: Instant,
    end: Option<Instant>,
}

/// Collector for search metrics.
#[derive(Debug)]
pub struct MetricsCollector {
    search_id: SearchId,
    catalog: Option<String>,
    start: Instant,
    phases: Vec<PhaseBuilder>,
    catalog_size: usize,
    matched: usize,
    returned: usize,
}

impl MetricsCollector {
    pub fn new(search_id: SearchId) -> Self {
        Self {
            search_id,
            catalog: None,
            start: Instant::now(),
            phases: Vec::new(),
            catalog_size: 0,
            matched: 0,
            returned: 0,
        }
    }

    pub fn set_catalog(&mut self, catalog: impl Into<String>) {
        self.catalog = Some(catalog.into());
    }

    /// Record phase start. Restarting a phase discards its earlier timing.
    pub fn record_phase_start(&mut self, name: &str) {
        self.phases.retain(|p| p.name != name);
        self.phases.push(PhaseBuilder {
            name: name.to_string(),
            start: Instant::now(),
            end: None,
        });
    }

    /// Record phase end. Unknown phases are recorded with zero duration.
    pub fn record_phase_end(&mut self, name: &str) {
        let now = Instant::now();
        match self.phases.iter_mut().find(|p| p.name == name) {
            Some(phase) => phase.end = Some(now),
            None => self.phases.push(PhaseBuilder {
                name: name.to_string(),
                start: now,
                end: Some(now),
            }),
        }
    }

    /// Run `f` as the named phase.
    pub fn time<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        self.record_phase_start(name);
        let out = f();
        self.record_phase_end(name);
        out
    }

    pub fn set_counts(&mut self, catalog_size: usize, matched: usize, returned: usize) {
        self.catalog_size = catalog_size;
        self.matched = matched;
        self.returned = returned;
    }

    /// Duration of a finished phase.
    pub fn phase_duration(&self, name: &str) -> Option<Duration> {
        self.phases
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.end.map(|end| end.duration_since(p.start)))
    }

    /// Finalize and return the metrics. Unfinished phases end now.
    pub fn finalize(self) -> SearchMetrics {
        let now = Instant::now();
        let start = self.start;

        let phases = self
            .phases
            .into_iter()
            .map(|p| PhaseMetrics {
                name: p.name,
                start_us: p.start.duration_since(start).as_micros() as u64,
                duration_us: p.end.unwrap_or(now).duration_since(p.start).as_micros() as u64,
            })
            .collect();

        SearchMetrics {
            search_id: self.search_id.to_string(),
            catalog: self.catalog,
            catalog_size: self.catalog_size,
            matched: self.matched,
            returned: self.returned,
            phases,
            total_duration_us: now.duration_since(start).as_micros() as u64,
        }
    }
}

impl SearchMetrics {
    pub fn phase(&self, name: &str) -> Option<&PhaseMetrics> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Search: {}", self.search_id));
        if let Some(catalog) = &self.catalog {
            lines.push(format!("  Catalog: {} ({} items)", catalog, self.catalog_size));
        }
        lines.push(format!(
            "  Matched: {} (returned {})",
            self.matched, self.returned
        ));

        if !self.phases.is_empty() {
            lines.push("  Phases:".to_string());
            for phase in &self.phases {
                lines.push(format!(
                    "    {}: {}us ({:.2}ms)",
                    phase.name,
                    phase.duration_us,
                    phase.duration_us as f64 / 1000.0
                ));
            }
        }

        lines.push(format!(
            "  Total: {}us ({:.2}ms)",
            self.total_duration_us,
            self.total_duration_us as f64 / 1000.0
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_recorded_in_order() {
        let mut collector = MetricsCollector::new(SearchId::from_string("s-9"));
        collector.set_catalog("catalog.json");

        let n = collector.time("derive", || 2 + 2);
        assert_eq!(n, 4);
        collector.time("filter", || ());
        collector.set_counts(10, 4, 4);
        assert!(collector.phase_duration("derive").is_some());

        let metrics = collector.finalize();
        let names: Vec<_> = metrics.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["derive", "filter"]);
        assert_eq!(metrics.matched, 4);
        assert!(metrics.phase("filter").is_some());
        assert!(metrics.phase("sort").is_none());
    }

    #[test]
    fn test_phase_duration_excludes_earlier_phases() {
        let mut collector = MetricsCollector::new(SearchId::from_string("s-4"));
        collector.time("load", || std::thread::sleep(Duration::from_millis(20)));
        collector.time("filter", || ());

        let load = collector.phase_duration("load").unwrap();
        let filter = collector.phase_duration("filter").unwrap();
        assert!(load >= Duration::from_millis(20));
        assert!(filter < load);
        assert!(collector.phase_duration("sort").is_none());
    }

    #[test]
    fn test_restart_replaces_phase() {
        let mut collector = MetricsCollector::new(SearchId::from_string("s-1"));
        collector.record_phase_start("filter");
        collector.record_phase_start("filter");
        collector.record_phase_end("filter");
        assert_eq!(collector.finalize().phases.len(), 1);
    }

    #[test]
    fn test_end_without_start() {
        let mut collector = MetricsCollector::new(SearchId::from_string("s-2"));
        collector.record_phase_end("sort");
        let metrics = collector.finalize();
        assert_eq!(metrics.phase("sort").map(|p| p.duration_us), Some(0));
    }

    #[test]
    fn test_summary_and_json() {
        let mut collector = MetricsCollector::new(SearchId::from_string("s-3"));
        collector.set_catalog("gems.json");
        collector.time("load", || ());
        collector.set_counts(7, 2, 2);
        let metrics = collector.finalize();

        let summary = metrics.to_summary();
        assert!(summary.starts_with("Search: s-3"));
        assert!(summary.contains("Catalog: gems.json (7 items)"));
        assert!(summary.contains("load:"));

        let back: SearchMetrics = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(back.matched, 2);
        assert_eq!(back.catalog.as_deref(), Some("gems.json"));
    }
}
