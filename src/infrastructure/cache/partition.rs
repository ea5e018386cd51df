//! A single cache partition: bounded map with TTL, idle timeout and LRU
//! eviction
//!
//! Expiry is lazy: an expired entry is treated as absent and purged the
//! next time it is touched. Eviction runs at insertion time when the
//! partition is full; ties on last access break by insertion order so a
//! full partition always evicts deterministically.

use super::config::{PartitionConfig, PartitionStats};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio::time::Instant;

/// One resident cache entry
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    value: serde_json::Value,
    inserted_at: Instant,
    last_accessed: Instant,
    /// Insertion sequence, the eviction tie-break
    seq: u64,
}

impl CacheEntry {
    fn is_expired(&self, policy: &PartitionConfig, now: Instant) -> bool {
        now.duration_since(self.inserted_at) >= policy.ttl()
            || now.duration_since(self.last_accessed) >= policy.max_idle()
    }
}

/// Storage and counters for one partition
pub(crate) struct PartitionStore {
    policy: PartitionConfig,
    entries: RwLock<HashMap<String, CacheEntry>>,
    seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl PartitionStore {
    pub(crate) fn new(policy: PartitionConfig) -> Self {
        Self {
            policy,
            entries: RwLock::new(HashMap::new()),
            seq: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up a key; a hit refreshes the access time, an expired entry is
    /// purged and reported as a miss
    pub(crate) async fn get_value(&self, key: &str) -> Option<serde_json::Value> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let expired = entries.get(key).map(|entry| entry.is_expired(&self.policy, now));
        match expired {
            Some(false) => match entries.get_mut(key) {
                Some(entry) => {
                    entry.last_accessed = now;
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    Some(entry.value.clone())
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    None
                }
            },
            Some(true) => {
                entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite a key, evicting to honor the size cap
    pub(crate) async fn put_value(&self, key: &str, value: serde_json::Value) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if !entries.contains_key(key) && entries.len() >= self.policy.max_entries {
            // Expired entries go first; they are free to reclaim.
            entries.retain(|_, entry| !entry.is_expired(&self.policy, now));
            while entries.len() >= self.policy.max_entries {
                let victim = entries
                    .iter()
                    .min_by_key(|(_, entry)| (entry.last_accessed, entry.seq))
                    .map(|(k, _)| k.clone());
                match victim {
                    Some(k) => {
                        entries.remove(&k);
                        self.evictions.fetch_add(1, Ordering::Relaxed);
                    }
                    None => break,
                }
            }
        }

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: now,
                last_accessed: now,
                seq,
            },
        );
    }

    /// Remove a key unconditionally
    pub(crate) async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Drop every entry
    pub(crate) async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Reclaim expired entries; used by the proactive sweep
    pub(crate) async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(&self.policy, now));
        before - entries.len()
    }

    /// Counter snapshot; purges expired entries first so `size` reports
    /// only resident data
    pub(crate) async fn stats(&self) -> PartitionStats {
        self.purge_expired().await;
        PartitionStats {
            size: self.entries.read().await.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn policy(ttl_secs: u64, max_idle_secs: u64, max_entries: usize) -> PartitionConfig {
        PartitionConfig {
            ttl_secs,
            max_idle_secs,
            max_entries,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hit_refreshes_access_time() {
        let store = PartitionStore::new(policy(100, 10, 8));
        store.put_value("k", json!(1)).await;

        // Touch the entry every 5 simulated seconds; idle expiry never fires.
        for _ in 0..4 {
            tokio::time::advance(Duration::from_secs(5)).await;
            assert!(store.get_value("k").await.is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_expiry_fires_before_ttl() {
        let store = PartitionStore::new(policy(100, 10, 8));
        store.put_value("k", json!(1)).await;

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(store.get_value("k").await.is_none());
        assert_eq!(store.stats().await.misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_expiry_fires_despite_recent_access() {
        let store = PartitionStore::new(policy(10, 100, 8));
        store.put_value("k", json!(1)).await;

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(store.get_value("k").await.is_some());
        tokio::time::advance(Duration::from_secs(6)).await;
        // 12s since insertion: past ttl even though accessed 6s ago.
        assert!(store.get_value("k").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn size_cap_evicts_least_recently_used() {
        let store = PartitionStore::new(policy(1000, 1000, 2));
        store.put_value("a", json!(1)).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        store.put_value("b", json!(2)).await;
        tokio::time::advance(Duration::from_secs(1)).await;

        // Touch "a" so "b" becomes least recently used.
        assert!(store.get_value("a").await.is_some());
        store.put_value("c", json!(3)).await;

        assert!(store.get_value("b").await.is_none());
        assert!(store.get_value("a").await.is_some());
        assert!(store.get_value("c").await.is_some());
        assert_eq!(store.stats().await.evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn equal_access_times_evict_in_insertion_order() {
        let store = PartitionStore::new(policy(1000, 1000, 2));
        // Same paused instant for both: identical last_accessed.
        store.put_value("first", json!(1)).await;
        store.put_value("second", json!(2)).await;

        tokio::time::advance(Duration::from_secs(1)).await;
        store.put_value("third", json!(3)).await;

        assert!(store.get_value("first").await.is_none());
        assert!(store.get_value("second").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_reclaimed_before_live_evictions() {
        let store = PartitionStore::new(policy(10, 10, 2));
        store.put_value("stale", json!(1)).await;
        tokio::time::advance(Duration::from_secs(11)).await;
        store.put_value("fresh", json!(2)).await;

        // "stale" is past ttl; inserting a third entry reclaims it instead
        // of evicting "fresh".
        store.put_value("newer", json!(3)).await;
        assert!(store.get_value("fresh").await.is_some());
        assert!(store.get_value("newer").await.is_some());
        assert_eq!(store.stats().await.evictions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn overshoot_never_outlives_the_cap() {
        let store = PartitionStore::new(policy(1000, 1000, 4));
        for i in 0..32 {
            store.put_value(&format!("k{i}"), json!(i)).await;
            tokio::time::advance(Duration::from_millis(10)).await;
        }
        assert!(store.stats().await.size <= 4);
    }

    #[tokio::test(start_paused = true)]
    async fn purge_reports_reclaimed_count() {
        let store = PartitionStore::new(policy(10, 10, 8));
        store.put_value("a", json!(1)).await;
        store.put_value("b", json!(2)).await;
        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(store.purge_expired().await, 2);
        assert_eq!(store.stats().await.size, 0);
    }
}
