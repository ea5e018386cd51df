//! Derived vote counters
//!
//! Counts are computed per call with explicit aggregate queries against the
//! vote store, never by iterating a loaded collection, and never maintained
//! as shadow counters; the `votes` cache partition bounds how often the
//! aggregates run.

use crate::domain::error::Result;
use crate::domain::ports::VoteRepository;
use crate::domain::types::{IdeaId, VoteCounts, VoteType};
use crate::infrastructure::cache::{CacheLayer, CachePartition, CacheResult};
use std::sync::Arc;

/// Derives up/down counts for an idea from the authoritative vote store
pub struct CounterAggregator {
    votes: Arc<dyn VoteRepository>,
    cache: Arc<CacheLayer>,
}

impl CounterAggregator {
    pub fn new(votes: Arc<dyn VoteRepository>, cache: Arc<CacheLayer>) -> Self {
        Self { votes, cache }
    }

    /// Current vote counts for an idea
    pub async fn counts_for(&self, idea: IdeaId) -> Result<VoteCounts> {
        let key = idea.to_string();
        match self.cache.get::<VoteCounts>(CachePartition::Votes, &key).await {
            CacheResult::Hit(counts) => return Ok(counts),
            CacheResult::Miss => {}
            CacheResult::Error(e) => {
                tracing::warn!(%idea, "vote-count cache read failed, using store: {e}");
            }
        }

        let counts = VoteCounts {
            upvotes: self.votes.count_by_type(idea, VoteType::Up).await?,
            downvotes: self.votes.count_by_type(idea, VoteType::Down).await?,
        };

        if let Err(e) = self.cache.put(CachePartition::Votes, &key, &counts).await {
            tracing::warn!(%idea, "vote-count cache write failed: {e}");
        }
        Ok(counts)
    }
}
