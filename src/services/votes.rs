//! Vote casting and the toggle state machine
//!
//! Per (idea, user) pair the state is NONE, UP or DOWN, the only stateful
//! entity in the core. Casting moves NONE to the requested type, the same
//! type back to NONE (toggle-off), and the opposite type across in place.
//!
//! The read-modify-write runs as read state, decide transition, then a
//! compare-and-swap against the authoritative store keyed on the unique
//! pair. A lost race re-reads fresh state and retries once before
//! surfacing a conflict, which keeps the rare interleaving retriable
//! without hiding a persistent fault.

use crate::domain::error::{Error, Result};
use crate::domain::ports::{IdeaRepository, UserDirectory, VoteRepository};
use crate::domain::types::{IdeaId, UserId, VoteCounts, VoteType};
use crate::services::counters::CounterAggregator;
use crate::services::invalidation::InvalidationCoordinator;
use std::sync::Arc;

/// Number of compare-and-swap attempts before a conflict surfaces
const CAS_ATTEMPTS: usize = 2;

/// Owns the per-(idea, user) vote state machine
pub struct VoteService {
    ideas: Arc<dyn IdeaRepository>,
    votes: Arc<dyn VoteRepository>,
    users: Arc<dyn UserDirectory>,
    counters: Arc<CounterAggregator>,
    invalidation: Arc<InvalidationCoordinator>,
}

impl VoteService {
    pub fn new(
        ideas: Arc<dyn IdeaRepository>,
        votes: Arc<dyn VoteRepository>,
        users: Arc<dyn UserDirectory>,
        counters: Arc<CounterAggregator>,
        invalidation: Arc<InvalidationCoordinator>,
    ) -> Self {
        Self {
            ideas,
            votes,
            users,
            counters,
            invalidation,
        }
    }

    /// Cast a vote, toggling off when the same type is already held
    ///
    /// Returns the idea's fresh counts after the transition. The cache is
    /// invalidated synchronously before returning, so the caller's next
    /// read observes its own write.
    pub async fn cast_vote(
        &self,
        idea: IdeaId,
        user: UserId,
        requested: VoteType,
    ) -> Result<VoteCounts> {
        self.ensure_idea_exists(idea).await?;
        self.ensure_user_resolves(user).await?;

        for _ in 0..CAS_ATTEMPTS {
            let current = self.votes.find(idea, user).await?.map(|v| v.vote_type);
            let desired = if current == Some(requested) {
                None // toggle-off
            } else {
                Some(requested)
            };

            if self
                .votes
                .compare_and_swap(idea, user, current, desired)
                .await?
            {
                tracing::debug!(%idea, %user, ?current, ?desired, "vote transition committed");
                self.invalidation.after_vote_mutation(idea).await;
                return self.counters.counts_for(idea).await;
            }
            tracing::debug!(%idea, %user, "vote transition lost the race, retrying");
        }

        Err(Error::conflict(format!(
            "concurrent vote update for idea {idea} by user {user}"
        )))
    }

    /// Cast a vote given the wire representation of the type
    ///
    /// Controllers validate upstream; the core still rejects anything
    /// outside "up"/"down" defensively.
    pub async fn cast_vote_raw(
        &self,
        idea: IdeaId,
        user: UserId,
        requested: &str,
    ) -> Result<VoteCounts> {
        self.cast_vote(idea, user, requested.parse()?).await
    }

    /// Remove the user's vote; a no-op when no vote is held
    pub async fn remove_vote(&self, idea: IdeaId, user: UserId) -> Result<VoteCounts> {
        self.ensure_idea_exists(idea).await?;

        for _ in 0..CAS_ATTEMPTS {
            let current = self.votes.find(idea, user).await?.map(|v| v.vote_type);
            if current.is_none() {
                return self.counters.counts_for(idea).await;
            }
            if self.votes.compare_and_swap(idea, user, current, None).await? {
                tracing::debug!(%idea, %user, ?current, "vote removed");
                self.invalidation.after_vote_mutation(idea).await;
                return self.counters.counts_for(idea).await;
            }
        }

        Err(Error::conflict(format!(
            "concurrent vote removal for idea {idea} by user {user}"
        )))
    }

    /// The user's current vote for an idea; read-only, no side effects
    pub async fn current_vote(&self, idea: IdeaId, user: UserId) -> Result<Option<VoteType>> {
        Ok(self.votes.find(idea, user).await?.map(|v| v.vote_type))
    }

    async fn ensure_idea_exists(&self, idea: IdeaId) -> Result<()> {
        match self.ideas.find_by_id(idea).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("idea {idea}"))),
        }
    }

    async fn ensure_user_resolves(&self, user: UserId) -> Result<()> {
        match self.users.resolve(user).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("user {user}"))),
        }
    }
}
