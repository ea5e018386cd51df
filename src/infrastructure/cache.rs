//! Bounded partitioned cache
//!
//! A self-contained in-memory cache partitioned by entity class (idea
//! detail, ranked views, vote counts). Each partition carries its own TTL,
//! idle timeout and size cap, with LRU eviction among non-expired entries.
//!
//! The cache is an optimization, never a dependency: every caller treats a
//! [`CacheResult::Error`] exactly like a miss and falls through to the
//! authoritative store. Values are serialized to `serde_json::Value` so one
//! store serves every cached type.

mod config;
mod partition;

pub use config::{
    CacheConfig, CachePartition, CachePartitionsConfig, CacheResult, PartitionConfig,
    PartitionStats,
};

use crate::domain::error::{Error, Result};
use partition::PartitionStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// The cache layer, shared across services behind an `Arc`
pub struct CacheLayer {
    config: CacheConfig,
    ideas: PartitionStore,
    rankings: PartitionStore,
    votes: PartitionStore,
}

impl CacheLayer {
    /// Create a cache layer from validated configuration
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        if config.enabled {
            tracing::info!("cache enabled");
        } else {
            tracing::info!("cache disabled, all reads go to the authoritative store");
        }
        Ok(Self {
            ideas: PartitionStore::new(config.partitions.ideas),
            rankings: PartitionStore::new(config.partitions.rankings),
            votes: PartitionStore::new(config.partitions.votes),
            config,
        })
    }

    /// Whether caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn store(&self, partition: CachePartition) -> &PartitionStore {
        match partition {
            CachePartition::Ideas => &self.ideas,
            CachePartition::Rankings => &self.rankings,
            CachePartition::Votes => &self.votes,
        }
    }

    /// Get a value from a partition
    pub async fn get<T>(&self, partition: CachePartition, key: &str) -> CacheResult<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        if !self.config.enabled {
            return CacheResult::Miss;
        }
        match self.store(partition).get_value(key).await {
            Some(value) => match serde_json::from_value(value) {
                Ok(deserialized) => CacheResult::Hit(deserialized),
                Err(e) => CacheResult::Error(Error::cache(format!(
                    "failed to deserialize cached {partition} entry: {e}"
                ))),
            },
            None => CacheResult::Miss,
        }
    }

    /// Insert or overwrite a value in a partition
    pub async fn put<T>(&self, partition: CachePartition, key: &str, value: &T) -> Result<()>
    where
        T: serde::Serialize,
    {
        if !self.config.enabled {
            return Ok(());
        }
        let data = serde_json::to_value(value)?;
        self.store(partition).put_value(key, data).await;
        Ok(())
    }

    /// Remove an entry unconditionally
    pub async fn invalidate(&self, partition: CachePartition, key: &str) {
        if !self.config.enabled {
            return;
        }
        self.store(partition).invalidate(key).await;
    }

    /// Drop all entries in one partition
    pub async fn clear(&self, partition: CachePartition) {
        self.store(partition).clear().await;
    }

    /// Drop all entries in every partition
    pub async fn clear_all(&self) {
        for partition in CachePartition::ALL {
            self.store(partition).clear().await;
        }
    }

    /// Counter snapshot for one partition
    pub async fn stats(&self, partition: CachePartition) -> PartitionStats {
        self.store(partition).stats().await
    }

    /// Counter snapshots for every partition, keyed by partition name
    pub async fn stats_all(&self) -> BTreeMap<String, PartitionStats> {
        let mut all = BTreeMap::new();
        for partition in CachePartition::ALL {
            all.insert(partition.to_string(), self.stats(partition).await);
        }
        all
    }

    /// Start the optional proactive sweep of expired entries
    ///
    /// Lazy expiry keeps the contract correct without this; the sweep only
    /// reclaims memory for entries nobody touches again. Returns `None`
    /// when disabled or unconfigured.
    pub fn spawn_sweeper(self: &Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enabled {
            return None;
        }
        let interval_secs = self.config.sweep_interval_secs?;
        let cache = Arc::clone(self);
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut reclaimed = 0;
                for partition in CachePartition::ALL {
                    reclaimed += cache.store(partition).purge_expired().await;
                }
                if reclaimed > 0 {
                    tracing::debug!(reclaimed, "cache sweep reclaimed expired entries");
                }
            }
        }))
    }
}
