//! Cache invalidation after store mutations
//!
//! Runs synchronously inside every mutating call, after the store commit
//! and before the result returns to the caller, which is what gives a
//! writer read-your-writes on its next read. The coordinator only evicts;
//! it never mutates the stores and never repopulates entries.

use crate::domain::types::{IdeaId, SortOrder};
use crate::infrastructure::cache::{CacheLayer, CachePartition};
use std::sync::Arc;

/// Evicts exactly the cache entries a mutation invalidates
pub struct InvalidationCoordinator {
    cache: Arc<CacheLayer>,
}

impl InvalidationCoordinator {
    pub fn new(cache: Arc<CacheLayer>) -> Self {
        Self { cache }
    }

    /// A vote transition committed for `idea`
    ///
    /// Vote totals changed: the idea's detail and count entries are stale,
    /// and so is the vote-ordered view. Views ordered by newest/comments
    /// are untouched by a pure vote mutation.
    pub async fn after_vote_mutation(&self, idea: IdeaId) {
        let key = idea.to_string();
        self.cache.invalidate(CachePartition::Ideas, &key).await;
        self.cache.invalidate(CachePartition::Votes, &key).await;
        self.cache
            .invalidate(CachePartition::Rankings, &SortOrder::Votes.to_string())
            .await;
        tracing::debug!(%idea, "invalidated vote-dependent cache entries");
    }

    /// `idea` was created, updated or deleted
    ///
    /// Membership or ordering of every view may change.
    pub async fn after_idea_mutation(&self, idea: IdeaId) {
        let key = idea.to_string();
        self.cache.invalidate(CachePartition::Ideas, &key).await;
        self.cache.invalidate(CachePartition::Votes, &key).await;
        for sort in SortOrder::ALL {
            self.cache
                .invalidate(CachePartition::Rankings, &sort.to_string())
                .await;
        }
        tracing::debug!(%idea, "invalidated idea cache entries and ranked views");
    }

    /// A comment was added to or removed from `idea`
    pub async fn after_comment_mutation(&self, idea: IdeaId) {
        self.cache
            .invalidate(CachePartition::Ideas, &idea.to_string())
            .await;
        self.cache
            .invalidate(CachePartition::Rankings, &SortOrder::Comments.to_string())
            .await;
        tracing::debug!(%idea, "invalidated comment-dependent cache entries");
    }
}
