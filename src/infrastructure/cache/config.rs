//! Cache configuration and result types

use crate::domain::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The entity classes the cache is partitioned by
///
/// Each partition is an isolated namespace with its own TTL, idle timeout
/// and size policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePartition {
    /// Idea detail snapshots, keyed by idea id
    Ideas,
    /// Ranked views, keyed by sort order
    Rankings,
    /// Per-idea vote counts, keyed by idea id
    Votes,
}

impl CachePartition {
    /// All partitions
    pub const ALL: [Self; 3] = [Self::Ideas, Self::Rankings, Self::Votes];

    /// The partition's namespace name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ideas => "ideas",
            Self::Rankings => "rankings",
            Self::Votes => "votes",
        }
    }
}

impl fmt::Display for CachePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for a single cache partition
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Absolute expiry from insertion, in seconds
    pub ttl_secs: u64,
    /// Expiry from last access, in seconds
    pub max_idle_secs: u64,
    /// Entry-count cap; the least-recently-used non-expired entry is
    /// evicted to make room
    pub max_entries: usize,
}

impl PartitionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn max_idle(&self) -> Duration {
        Duration::from_secs(self.max_idle_secs)
    }
}

/// Per-partition policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachePartitionsConfig {
    /// Idea detail snapshots
    pub ideas: PartitionConfig,
    /// Ranked views
    pub rankings: PartitionConfig,
    /// Per-idea vote counts
    pub votes: PartitionConfig,
}

impl Default for CachePartitionsConfig {
    fn default() -> Self {
        Self {
            ideas: PartitionConfig {
                ttl_secs: 3600,     // 1 hour
                max_idle_secs: 1800, // 30 minutes
                max_entries: 10_000,
            },
            rankings: PartitionConfig {
                ttl_secs: 300,     // 5 minutes
                max_idle_secs: 120, // 2 minutes
                max_entries: 64,
            },
            votes: PartitionConfig {
                ttl_secs: 1800,    // 30 minutes
                max_idle_secs: 900, // 15 minutes
                max_entries: 50_000,
            },
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled; a disabled cache misses on every read
    /// and drops every write
    pub enabled: bool,
    /// Interval for the optional proactive sweep of expired entries, in
    /// seconds; `None` relies on lazy expiry alone
    pub sweep_interval_secs: Option<u64>,
    /// Per-partition policies
    pub partitions: CachePartitionsConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_interval_secs: Some(300),
            partitions: CachePartitionsConfig::default(),
        }
    }
}

impl CacheConfig {
    /// The policy for a partition
    pub fn partition(&self, partition: CachePartition) -> &PartitionConfig {
        match partition {
            CachePartition::Ideas => &self.partitions.ideas,
            CachePartition::Rankings => &self.partitions.rankings,
            CachePartition::Votes => &self.partitions.votes,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Error> {
        if !self.enabled {
            return Ok(());
        }
        for partition in CachePartition::ALL {
            let policy = self.partition(partition);
            if policy.ttl_secs == 0 {
                return Err(Error::config(format!(
                    "cache partition {partition}: ttl cannot be 0 when the cache is enabled"
                )));
            }
            if policy.max_idle_secs == 0 {
                return Err(Error::config(format!(
                    "cache partition {partition}: max idle cannot be 0 when the cache is enabled"
                )));
            }
            if policy.max_entries == 0 {
                return Err(Error::config(format!(
                    "cache partition {partition}: max entries cannot be 0 when the cache is enabled"
                )));
            }
        }
        Ok(())
    }
}

/// Read-only view of one partition's counters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartitionStats {
    /// Resident (non-expired) entry count
    pub size: usize,
    /// Cache hit count
    pub hits: u64,
    /// Cache miss count
    pub misses: u64,
    /// LRU evictions performed to honor the size cap
    pub evictions: u64,
}

/// Cache operation result
#[derive(Debug)]
pub enum CacheResult<T> {
    /// Cache hit with data
    Hit(T),
    /// Cache miss
    Miss,
    /// Cache error; callers degrade to the authoritative path
    Error(Error),
}

impl<T> CacheResult<T> {
    /// Check if this is a cache hit
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// Check if this is a cache miss
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss)
    }

    /// Get the data if it's a hit
    pub fn data(self) -> Option<T> {
        match self {
            Self::Hit(data) => Some(data),
            _ => None,
        }
    }
}
