//! Engine-agnostic query metrics.
//!
//! Feature-gated and runtime-toggled; with the `metrics` feature off every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use octree_accel::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Read counters accumulated by an accelerator:
//! let snapshot = accel.metrics();
//! println!("{:.1} triangle tests per ray", snapshot.avg_triangle_tests());
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::intersection::QueryMode;
use crate::octree::TraversalStats;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Lock-free counters shared by concurrent queries on one accelerator.
#[derive(Debug, Default)]
pub struct QueryCounters {
    rays: AtomicU64,
    shadow_rays: AtomicU64,
    hits: AtomicU64,
    nodes_visited: AtomicU64,
    leaves_tested: AtomicU64,
    triangle_tests: AtomicU64,
}

impl QueryCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished query.
    pub fn record_query(&self, mode: QueryMode, hit: bool, stats: &TraversalStats) {
        if !is_enabled() {
            return;
        }

        match mode {
            QueryMode::Nearest => self.rays.fetch_add(1, Ordering::Relaxed),
            QueryMode::Shadow => self.shadow_rays.fetch_add(1, Ordering::Relaxed),
        };
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        self.nodes_visited
            .fetch_add(stats.nodes_visited as u64, Ordering::Relaxed);
        self.leaves_tested
            .fetch_add(stats.leaves_tested as u64, Ordering::Relaxed);
        self.triangle_tests
            .fetch_add(stats.triangle_tests as u64, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> QueryMetrics {
        QueryMetrics {
            rays: self.rays.load(Ordering::Relaxed),
            shadow_rays: self.shadow_rays.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            nodes_visited: self.nodes_visited.load(Ordering::Relaxed),
            leaves_tested: self.leaves_tested.load(Ordering::Relaxed),
            triangle_tests: self.triangle_tests.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.rays.store(0, Ordering::Relaxed);
        self.shadow_rays.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.nodes_visited.store(0, Ordering::Relaxed);
        self.leaves_tested.store(0, Ordering::Relaxed);
        self.triangle_tests.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`QueryCounters`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryMetrics {
    /// Nearest-hit queries.
    pub rays: u64,
    /// Shadow queries.
    pub shadow_rays: u64,
    /// Queries of either kind that found something.
    pub hits: u64,
    pub nodes_visited: u64,
    pub leaves_tested: u64,
    pub triangle_tests: u64,
}

impl QueryMetrics {
    /// Total queries of both kinds.
    pub fn total_queries(&self) -> u64 {
        self.rays + self.shadow_rays
    }

    /// Fraction of queries that hit.
    pub fn hit_rate(&self) -> f64 {
        match self.total_queries() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }

    /// Get average triangle tests per query.
    pub fn avg_triangle_tests(&self) -> f64 {
        match self.total_queries() {
            0 => 0.0,
            n => self.triangle_tests as f64 / n as f64,
        }
    }

    /// Get average nodes visited per query.
    pub fn avg_nodes_visited(&self) -> f64 {
        match self.total_queries() {
            0 => 0.0,
            n => self.nodes_visited as f64 / n as f64,
        }
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;

    fn stats(triangle_tests: usize) -> TraversalStats {
        TraversalStats {
            nodes_visited: 3,
            leaves_collected: 2,
            leaves_tested: 1,
            triangle_tests,
        }
    }

    #[test]
    fn test_record_and_snapshot() {
        let counters = QueryCounters::new();

        counters.record_query(QueryMode::Nearest, true, &stats(4));
        counters.record_query(QueryMode::Nearest, false, &stats(2));
        counters.record_query(QueryMode::Shadow, true, &stats(0));

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.rays, 2);
        assert_eq!(snapshot.shadow_rays, 1);
        assert_eq!(snapshot.hits, 2);
        assert_eq!(snapshot.nodes_visited, 9);
        assert_eq!(snapshot.leaves_tested, 3);
        assert_eq!(snapshot.triangle_tests, 6);
        assert_eq!(snapshot.total_queries(), 3);
        assert_eq!(snapshot.avg_triangle_tests(), 2.0);
    }

    #[test]
    fn test_reset() {
        let counters = QueryCounters::new();
        counters.record_query(QueryMode::Shadow, true, &stats(5));
        counters.reset();
        assert_eq!(counters.snapshot(), QueryMetrics::default());
    }

    #[test]
    fn test_empty_snapshot_averages() {
        let snapshot = QueryMetrics::default();
        assert_eq!(snapshot.hit_rate(), 0.0);
        assert_eq!(snapshot.avg_triangle_tests(), 0.0);
        assert_eq!(snapshot.avg_nodes_visited(), 0.0);
    }
}
