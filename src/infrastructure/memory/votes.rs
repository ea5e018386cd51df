//! In-memory vote store
//!
//! The map key is the unique (idea, user) pair, so one record per pair is
//! structural. `compare_and_swap` runs inside the DashMap entry lock for
//! that key: transitions for the same pair serialize, different pairs
//! proceed independently.

use crate::domain::error::Result;
use crate::domain::ports::VoteRepository;
use crate::domain::types::{IdeaId, UserId, Vote, VoteId, VoteType};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

/// DashMap-backed vote repository
#[derive(Default)]
pub struct MemoryVoteRepository {
    votes: DashMap<(IdeaId, UserId), Vote>,
    next_id: AtomicU64,
}

impl MemoryVoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteRepository for MemoryVoteRepository {
    async fn find(&self, idea: IdeaId, user: UserId) -> Result<Option<Vote>> {
        Ok(self.votes.get(&(idea, user)).map(|entry| entry.value().clone()))
    }

    async fn compare_and_swap(
        &self,
        idea: IdeaId,
        user: UserId,
        expected: Option<VoteType>,
        desired: Option<VoteType>,
    ) -> Result<bool> {
        match self.votes.entry((idea, user)) {
            Entry::Occupied(mut occupied) => {
                if expected != Some(occupied.get().vote_type) {
                    return Ok(false);
                }
                match desired {
                    Some(vote_type) => {
                        let vote = occupied.get_mut();
                        vote.vote_type = vote_type;
                        vote.cast_at = Utc::now();
                    }
                    None => {
                        occupied.remove();
                    }
                }
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                if expected.is_some() {
                    return Ok(false);
                }
                if let Some(vote_type) = desired {
                    let id = VoteId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
                    vacant.insert(Vote {
                        id,
                        idea_id: idea,
                        user_id: user,
                        vote_type,
                        cast_at: Utc::now(),
                    });
                }
                Ok(true)
            }
        }
    }

    async fn count_by_type(&self, idea: IdeaId, vote_type: VoteType) -> Result<u64> {
        Ok(self
            .votes
            .iter()
            .filter(|entry| entry.idea_id == idea && entry.vote_type == vote_type)
            .count() as u64)
    }

    async fn delete_for_idea(&self, idea: IdeaId) -> Result<()> {
        self.votes.retain(|(idea_id, _), _| *idea_id != idea);
        Ok(())
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(self.votes.len() as u64)
    }
}
