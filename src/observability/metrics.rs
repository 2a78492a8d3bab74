//! Metrics registry
//!
//! - Counters only, monotonic
//! - One registry per query builder
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters describing the queries one builder has run
///
/// Relaxed ordering is enough: counters are read only as snapshots.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Successful executions
    queries_executed: AtomicU64,
    /// Failed executions
    queries_failed: AtomicU64,
    /// Declarations rejected by the field validator
    fields_rejected: AtomicU64,
    /// Records fed into the pipeline
    records_scanned: AtomicU64,
    /// Records returned by the pipeline
    records_returned: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful execution
    pub fn record_execution(&self, scanned: usize, returned: usize) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        self.records_scanned
            .fetch_add(scanned as u64, Ordering::Relaxed);
        self.records_returned
            .fetch_add(returned as u64, Ordering::Relaxed);
    }

    /// Increment failed executions
    pub fn increment_queries_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rejected field declarations
    pub fn increment_fields_rejected(&self) {
        self.fields_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get successful executions
    pub fn queries_executed(&self) -> u64 {
        self.queries_executed.load(Ordering::Relaxed)
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            fields_rejected: self.fields_rejected.load(Ordering::Relaxed),
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
        }
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_failed: u64,
    pub fields_rejected: u64,
    pub records_scanned: u64,
    pub records_returned: u64,
}
