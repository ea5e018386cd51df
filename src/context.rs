//! Composition root
//!
//! Wires configuration, stores, cache and services into the object graph
//! controllers consume. The default constructor uses the in-memory stores;
//! `with_stores` accepts any implementations of the repository ports.

use crate::admin::AdminService;
use crate::config::BoardConfig;
use crate::domain::error::Result;
use crate::domain::ports::{CommentRepository, IdeaRepository, UserDirectory, VoteRepository};
use crate::infrastructure::cache::CacheLayer;
use crate::infrastructure::memory::{
    MemoryCommentRepository, MemoryIdeaRepository, MemoryUserDirectory, MemoryVoteRepository,
};
use crate::services::{
    CommentService, CounterAggregator, IdeaService, InvalidationCoordinator, RankingIndex,
    StatsService, VoteService,
};
use std::sync::Arc;

/// The assembled application core
pub struct BoardContext {
    pub config: BoardConfig,
    pub cache: Arc<CacheLayer>,
    pub ideas: Arc<IdeaService>,
    pub votes: Arc<VoteService>,
    pub comments: Arc<CommentService>,
    pub stats: Arc<StatsService>,
    pub admin: Arc<AdminService>,
}

impl BoardContext {
    /// Assemble the core over the in-memory stores
    ///
    /// Returns the context together with the user directory, which stands
    /// in for the identity provider and is where callers register users.
    pub fn new(config: BoardConfig) -> Result<(Self, Arc<MemoryUserDirectory>)> {
        let users = Arc::new(MemoryUserDirectory::new());
        let context = Self::with_stores(
            config,
            Arc::new(MemoryIdeaRepository::new()),
            Arc::new(MemoryVoteRepository::new()),
            Arc::new(MemoryCommentRepository::new()),
            users.clone(),
        )?;
        Ok((context, users))
    }

    /// Assemble the core over caller-provided stores
    pub fn with_stores(
        config: BoardConfig,
        ideas: Arc<dyn IdeaRepository>,
        votes: Arc<dyn VoteRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Result<Self> {
        config.validate()?;
        let cache = Arc::new(CacheLayer::new(config.cache.clone())?);
        let invalidation = Arc::new(InvalidationCoordinator::new(cache.clone()));
        let counters = Arc::new(CounterAggregator::new(votes.clone(), cache.clone()));
        let ranking = Arc::new(RankingIndex::new(
            ideas.clone(),
            comments.clone(),
            counters.clone(),
            cache.clone(),
        ));

        let vote_service = Arc::new(VoteService::new(
            ideas.clone(),
            votes.clone(),
            users.clone(),
            counters.clone(),
            invalidation.clone(),
        ));
        let idea_service = Arc::new(IdeaService::new(
            ideas.clone(),
            votes.clone(),
            comments.clone(),
            users.clone(),
            counters,
            ranking,
            invalidation.clone(),
            cache.clone(),
        ));
        let comment_service = Arc::new(CommentService::new(
            comments.clone(),
            ideas.clone(),
            users.clone(),
            invalidation,
        ));
        let stats_service = Arc::new(StatsService::new(ideas, votes, users));
        let admin = Arc::new(AdminService::new(cache.clone()));

        Ok(Self {
            config,
            cache,
            ideas: idea_service,
            votes: vote_service,
            comments: comment_service,
            stats: stats_service,
            admin,
        })
    }

    /// Start the optional proactive cache sweep
    pub fn start_sweeper(&self) -> Option<tokio::task::JoinHandle<()>> {
        self.cache.spawn_sweeper()
    }
}
