//! Observability for GemVault hosts.
//!
//! This crate provides:
//! - `SearchId` - Correlation id for one search session
//! - `StructuredLogger` - Structured logging with search context
//! - `MetricsCollector` / `SearchMetrics` - Per-phase timings of a search

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;
