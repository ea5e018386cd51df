//! Admin/observability boundary
//!
//! The cache-statistics contract the admin endpoints consume: per-partition
//! counters and a maintenance clear. Nothing here touches the
//! authoritative stores.

use crate::infrastructure::cache::{CacheLayer, PartitionStats};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Cache observability and maintenance operations
pub struct AdminService {
    cache: Arc<CacheLayer>,
}

impl AdminService {
    pub fn new(cache: Arc<CacheLayer>) -> Self {
        Self { cache }
    }

    /// Per-partition cache counters, keyed by partition name
    pub async fn cache_stats(&self) -> BTreeMap<String, PartitionStats> {
        self.cache.stats_all().await
    }

    /// Drop every cached entry in every partition
    ///
    /// Subsequent reads repopulate from the authoritative stores; clearing
    /// is always safe, never required.
    pub async fn clear_caches(&self) {
        self.cache.clear_all().await;
        tracing::info!("all cache partitions cleared");
    }
}
