//! In-process metrics collection.
//!
//! Counters track what happened to uploaded rows and the snapshot
//! cache; a presentation layer can render the snapshot as a stats
//! footer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Collected metrics for the metrics store.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    // Load metrics
    pub uploads_loaded: Counter,
    pub uploads_failed: Counter,
    pub rows_ingested: Counter,
    pub rows_rejected: Counter,
    pub rows_flagged: Counter,

    // Snapshot cache metrics
    pub cache_hits: Counter,
    pub cache_misses: Counter,

    // Gauges
    pub active_sessions: Gauge,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            timestamp: Utc::now(),
            uploads_loaded: self.uploads_loaded.get(),
            uploads_failed: self.uploads_failed.get(),
            rows_ingested: self.rows_ingested.get(),
            rows_rejected: self.rows_rejected.get(),
            rows_flagged: self.rows_flagged.get(),
            cache_hits: self.cache_hits.get(),
            cache_misses: self.cache_misses.get(),
            active_sessions: self.active_sessions.get(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub uploads_loaded: u64,
    pub uploads_failed: u64,
    pub rows_ingested: u64,
    pub rows_rejected: u64,
    pub rows_flagged: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub active_sessions: u64,
}
