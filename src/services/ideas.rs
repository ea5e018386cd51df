//! Idea CRUD and presentation
//!
//! Builds viewer-facing idea views: the stored record plus derived
//! counters, with the viewer's own vote looked up per request. The
//! viewer-independent part is cached as a snapshot in the `ideas`
//! partition; the per-viewer vote is a single-key store lookup and is
//! never cached.

use crate::domain::error::{Error, Result};
use crate::domain::ports::{CommentRepository, IdeaRepository, UserDirectory, VoteRepository};
use crate::domain::types::{
    Idea, IdeaId, IdeaUpdate, IdeaView, NewIdea, SortOrder, UserId, VoteCounts,
};
use crate::infrastructure::cache::{CacheLayer, CachePartition, CacheResult};
use crate::services::counters::CounterAggregator;
use crate::services::invalidation::InvalidationCoordinator;
use crate::services::ranking::RankingIndex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// The viewer-independent cacheable part of an idea view
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdeaSnapshot {
    idea: Idea,
    counts: VoteCounts,
    comment_count: u64,
}

/// Idea lifecycle and read operations
pub struct IdeaService {
    ideas: Arc<dyn IdeaRepository>,
    votes: Arc<dyn VoteRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserDirectory>,
    counters: Arc<CounterAggregator>,
    ranking: Arc<RankingIndex>,
    invalidation: Arc<InvalidationCoordinator>,
    cache: Arc<CacheLayer>,
}

impl IdeaService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ideas: Arc<dyn IdeaRepository>,
        votes: Arc<dyn VoteRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserDirectory>,
        counters: Arc<CounterAggregator>,
        ranking: Arc<RankingIndex>,
        invalidation: Arc<InvalidationCoordinator>,
        cache: Arc<CacheLayer>,
    ) -> Self {
        Self {
            ideas,
            votes,
            comments,
            users,
            counters,
            ranking,
            invalidation,
            cache,
        }
    }

    /// Create an idea authored by `author`
    pub async fn create_idea(&self, author: UserId, draft: NewIdea) -> Result<IdeaView> {
        draft.validate()?;
        if self.users.resolve(author).await?.is_none() {
            return Err(Error::not_found(format!("user {author}")));
        }

        let idea = self.ideas.insert(author, &draft).await?;
        tracing::info!(idea = %idea.id, %author, "idea created");
        self.invalidation.after_idea_mutation(idea.id).await;
        self.view_for(idea.id, None)
            .await?
            .ok_or_else(|| Error::internal(format!("idea {} vanished after insert", idea.id)))
    }

    /// Update an idea; only its author may edit it
    pub async fn update_idea(
        &self,
        id: IdeaId,
        editor: UserId,
        update: IdeaUpdate,
    ) -> Result<IdeaView> {
        update.validate()?;
        let mut idea = self
            .ideas
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("idea {id}")))?;
        if idea.author != editor {
            return Err(Error::unauthorized(format!(
                "user {editor} is not the author of idea {id}"
            )));
        }

        idea.title = update.title;
        idea.description = update.description;
        idea.tags = update.tags;
        idea.images = update.images;
        idea.updated_at = chrono::Utc::now();
        self.ideas.update(&idea).await?;

        self.invalidation.after_idea_mutation(id).await;
        self.view_for(id, None)
            .await?
            .ok_or_else(|| Error::internal(format!("idea {id} vanished after update")))
    }

    /// Delete an idea and its votes and comments; only its author may
    pub async fn delete_idea(&self, id: IdeaId, editor: UserId) -> Result<()> {
        let idea = self
            .ideas
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("idea {id}")))?;
        if idea.author != editor {
            return Err(Error::unauthorized(format!(
                "user {editor} is not the author of idea {id}"
            )));
        }

        self.ideas.delete(id).await?;
        self.votes.delete_for_idea(id).await?;
        self.comments.delete_for_idea(id).await?;
        tracing::info!(idea = %id, "idea deleted");
        self.invalidation.after_idea_mutation(id).await;
        Ok(())
    }

    /// One idea with counters, and the viewer's vote when given
    pub async fn get_idea(&self, id: IdeaId, viewer: Option<UserId>) -> Result<IdeaView> {
        self.view_for(id, viewer)
            .await?
            .ok_or_else(|| Error::not_found(format!("idea {id}")))
    }

    /// All ideas in the requested order, each with counters and the
    /// viewer's vote when given
    pub async fn list_ideas(
        &self,
        sort: SortOrder,
        viewer: Option<UserId>,
    ) -> Result<Vec<IdeaView>> {
        let ranked = self.ranking.ranked(sort).await?;
        let mut views = Vec::with_capacity(ranked.len());
        for id in ranked {
            // An idea deleted between ranking and snapshot just drops out.
            if let Some(view) = self.view_for(id, viewer).await? {
                views.push(view);
            }
        }
        Ok(views)
    }

    async fn view_for(&self, id: IdeaId, viewer: Option<UserId>) -> Result<Option<IdeaView>> {
        let Some(snapshot) = self.snapshot(id).await? else {
            return Ok(None);
        };
        let user_vote = match viewer {
            Some(user) => self.votes.find(id, user).await?.map(|v| v.vote_type),
            None => None,
        };
        let IdeaSnapshot {
            idea,
            counts,
            comment_count,
        } = snapshot;
        Ok(Some(IdeaView {
            id: idea.id,
            title: idea.title,
            description: idea.description,
            tags: idea.tags,
            images: idea.images,
            author: idea.author,
            created_at: idea.created_at,
            updated_at: idea.updated_at,
            upvotes: counts.upvotes,
            downvotes: counts.downvotes,
            comment_count,
            user_vote,
        }))
    }

    async fn snapshot(&self, id: IdeaId) -> Result<Option<IdeaSnapshot>> {
        let key = id.to_string();
        match self
            .cache
            .get::<IdeaSnapshot>(CachePartition::Ideas, &key)
            .await
        {
            CacheResult::Hit(snapshot) => return Ok(Some(snapshot)),
            CacheResult::Miss => {}
            CacheResult::Error(e) => {
                tracing::warn!(idea = %id, "idea cache read failed, using store: {e}");
            }
        }

        let Some(idea) = self.ideas.find_by_id(id).await? else {
            return Ok(None);
        };
        let snapshot = IdeaSnapshot {
            counts: self.counters.counts_for(id).await?,
            comment_count: self.comments.count_for_idea(id).await?,
            idea,
        };
        if let Err(e) = self.cache.put(CachePartition::Ideas, &key, &snapshot).await {
            tracing::warn!(idea = %id, "idea cache write failed: {e}");
        }
        Ok(Some(snapshot))
    }
}
