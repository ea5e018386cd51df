//! Board-wide aggregate totals

use crate::domain::error::Result;
use crate::domain::ports::{IdeaRepository, UserDirectory, VoteRepository};
use crate::domain::types::BoardStats;
use std::sync::Arc;

pub struct StatsService {
    ideas: Arc<dyn IdeaRepository>,
    votes: Arc<dyn VoteRepository>,
    users: Arc<dyn UserDirectory>,
}

impl StatsService {
    pub fn new(
        ideas: Arc<dyn IdeaRepository>,
        votes: Arc<dyn VoteRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            ideas,
            votes,
            users,
        }
    }

    /// Totals across the whole board
    pub async fn board_stats(&self) -> Result<BoardStats> {
        Ok(BoardStats {
            total_ideas: self.ideas.count().await?,
            total_votes: self.votes.count_all().await?,
            total_users: self.users.count().await?,
        })
    }
}
