//! Content-addressed snapshot cache.
//!
//! The original dashboards memoized their load function process-wide.
//! Here the memoization is explicit: a bounded cache keyed by the
//! fingerprint of the raw input, so re-loading identical files reuses
//! the normalized snapshot, and a changed upload misses by
//! construction. Invalidation is explicit too.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use store_core::{MetricsSnapshot, RawTables, Result};

/// Cache TTL for normalized snapshots (15 minutes).
const SNAPSHOT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Maximum cached snapshots.
const SNAPSHOT_CACHE_MAX_CAPACITY: u64 = 64;

/// Content-keyed cache of normalized snapshots.
#[derive(Clone)]
pub struct SnapshotCache {
    cache: Cache<u64, Arc<MetricsSnapshot>>,
}

impl SnapshotCache {
    /// Creates a cache with the default capacity and TTL.
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(SNAPSHOT_CACHE_MAX_CAPACITY)
                .time_to_live(SNAPSHOT_CACHE_TTL)
                .build(),
        }
    }

    /// Load an upload through the cache.
    ///
    /// Returns the cached snapshot when the same content was already
    /// normalized; otherwise normalizes, caches, and returns it. Load
    /// failures are not cached.
    pub fn load(&self, raw: &RawTables) -> Result<Arc<MetricsSnapshot>> {
        let key = raw.fingerprint();

        if let Some(cached) = self.cache.get(&key) {
            debug!(fingerprint = key, "snapshot cache hit");
            return Ok(cached);
        }

        let snapshot = Arc::new(MetricsSnapshot::load(raw)?);
        self.cache.insert(key, snapshot.clone());
        Ok(snapshot)
    }

    /// Forget the snapshot for one input fingerprint (new upload of
    /// the same files).
    pub fn invalidate(&self, fingerprint: u64) {
        self.cache.invalidate(&fingerprint);
    }

    /// Drop every cached snapshot.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Cached snapshot count (approximate, per moka semantics).
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}
