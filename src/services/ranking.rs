//! Ranked views over the idea population
//!
//! Views are recomputed lazily per request and cached, not maintained as
//! live sorted structures: idea volume is small enough that a sort per miss
//! beats keeping three concurrently-updated indexes consistent under vote
//! churn. At larger scale the replacement is an order-statistic structure
//! keyed by (score, id) updated on each vote transition.
//!
//! Tie-breaks are fixed so repeated queries with equal scores return a
//! stable order: ascending id for the score-based views, descending id for
//! `newest`.

use crate::domain::error::Result;
use crate::domain::ports::{CommentRepository, IdeaRepository};
use crate::domain::types::{Idea, IdeaId, SortOrder};
use crate::infrastructure::cache::{CacheLayer, CachePartition, CacheResult};
use crate::services::counters::CounterAggregator;
use std::cmp::Reverse;
use std::sync::Arc;

/// Produces ordered idea-id sequences for each sort key
pub struct RankingIndex {
    ideas: Arc<dyn IdeaRepository>,
    comments: Arc<dyn CommentRepository>,
    counters: Arc<CounterAggregator>,
    cache: Arc<CacheLayer>,
}

impl RankingIndex {
    pub fn new(
        ideas: Arc<dyn IdeaRepository>,
        comments: Arc<dyn CommentRepository>,
        counters: Arc<CounterAggregator>,
        cache: Arc<CacheLayer>,
    ) -> Self {
        Self {
            ideas,
            comments,
            counters,
            cache,
        }
    }

    /// The ordered view for a sort key
    pub async fn ranked(&self, sort: SortOrder) -> Result<Vec<IdeaId>> {
        let key = sort.to_string();
        match self
            .cache
            .get::<Vec<IdeaId>>(CachePartition::Rankings, &key)
            .await
        {
            CacheResult::Hit(view) => return Ok(view),
            CacheResult::Miss => {}
            CacheResult::Error(e) => {
                tracing::warn!(%sort, "ranking cache read failed, recomputing: {e}");
            }
        }

        let ideas = self.ideas.list_all().await?;
        let view = match sort {
            SortOrder::Newest => rank_newest(ideas),
            SortOrder::Votes => {
                let mut scored = Vec::with_capacity(ideas.len());
                for idea in &ideas {
                    let counts = self.counters.counts_for(idea.id).await?;
                    scored.push((idea.id, counts.total()));
                }
                rank_by_score(scored)
            }
            SortOrder::Comments => {
                let mut scored = Vec::with_capacity(ideas.len());
                for idea in &ideas {
                    let count = self.comments.count_for_idea(idea.id).await?;
                    scored.push((idea.id, count));
                }
                rank_by_score(scored)
            }
        };

        if let Err(e) = self.cache.put(CachePartition::Rankings, &key, &view).await {
            tracing::warn!(%sort, "ranking cache write failed: {e}");
        }
        Ok(view)
    }
}

/// Creation timestamp descending, then id descending
fn rank_newest(mut ideas: Vec<Idea>) -> Vec<IdeaId> {
    ideas.sort_by_key(|idea| (Reverse(idea.created_at), Reverse(idea.id)));
    ideas.into_iter().map(|idea| idea.id).collect()
}

/// Score descending, then id ascending
fn rank_by_score(mut scored: Vec<(IdeaId, u64)>) -> Vec<IdeaId> {
    scored.sort_by_key(|&(id, score)| (Reverse(score), id));
    scored.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::UserId;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn idea(id: u64, age_secs: i64) -> Idea {
        let created = Utc::now() - Duration::seconds(age_secs);
        Idea {
            id: IdeaId(id),
            title: format!("idea {id}"),
            description: "a test idea of sufficient length".to_string(),
            tags: vec![],
            images: vec![],
            author: UserId(Uuid::new_v4()),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn score_ties_break_by_ascending_id() {
        // A(score 3), B(score 3), C(score 5) => [C, A, B]
        let view = rank_by_score(vec![
            (IdeaId(1), 3),
            (IdeaId(2), 3),
            (IdeaId(3), 5),
        ]);
        assert_eq!(view, vec![IdeaId(3), IdeaId(1), IdeaId(2)]);
    }

    #[test]
    fn newest_ties_break_by_descending_id() {
        let mut a = idea(1, 60);
        let b = idea(2, 60);
        a.created_at = b.created_at;
        let view = rank_newest(vec![a, b, idea(3, 120)]);
        assert_eq!(view, vec![IdeaId(2), IdeaId(1), IdeaId(3)]);
    }

    #[test]
    fn ranking_is_stable_across_repeated_sorts() {
        let scored: Vec<(IdeaId, u64)> =
            (1..=16).map(|i| (IdeaId(i), u64::from(i as u8 % 3))).collect();
        let first = rank_by_score(scored.clone());
        let second = rank_by_score(scored);
        assert_eq!(first, second);
    }
}
