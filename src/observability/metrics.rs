//! Index metrics
//!
//! - Counters only, monotonic
//! - Reset only when the index is constructed
//! - Atomic, so read-only queries can count through `&self`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct IndexMetrics {
    /// `put` calls that changed the index
    puts_changed: AtomicU64,
    /// `put` calls that found the value already in place
    puts_unchanged: AtomicU64,
    /// Documents removed
    removes: AtomicU64,
    /// `remove` calls for unknown documents
    removes_not_found: AtomicU64,
    /// `clear` calls
    clears: AtomicU64,
    /// Consistency anomalies absorbed
    anomalies: AtomicU64,
    /// Queries resolved
    queries_executed: AtomicU64,
    /// Queries rejected by validation
    queries_rejected: AtomicU64,
}

impl IndexMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_puts_changed(&self) {
        self.puts_changed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_puts_unchanged(&self) {
        self.puts_unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_removes(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_removes_not_found(&self) {
        self.removes_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_clears(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_anomalies(&self) {
        self.anomalies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            puts_changed: self.puts_changed.load(Ordering::Relaxed),
            puts_unchanged: self.puts_unchanged.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            removes_not_found: self.removes_not_found.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            anomalies: self.anomalies.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.snapshot().to_json()
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub puts_changed: u64,
    pub puts_unchanged: u64,
    pub removes: u64,
    pub removes_not_found: u64,
    pub clears: u64,
    pub anomalies: u64,
    pub queries_executed: u64,
    pub queries_rejected: u64,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "puts_changed": self.puts_changed,
            "puts_unchanged": self.puts_unchanged,
            "removes": self.removes,
            "removes_not_found": self.removes_not_found,
            "clears": self.clears,
            "anomalies": self.anomalies,
            "queries_executed": self.queries_executed,
            "queries_rejected": self.queries_rejected,
        })
    }
}
