//! Repository ports
//!
//! Abstractions over the authoritative stores. The repository pattern keeps
//! the service layer independent of the storage backend; the crate ships
//! in-memory implementations, a relational backend slots in behind the same
//! traits.

use crate::domain::error::Result;
use crate::domain::types::{
    Comment, CommentId, Idea, IdeaId, NewIdea, UserId, UserProfile, Vote, VoteType,
};
use async_trait::async_trait;

/// Store of idea records
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// Persist a new idea, assigning its id and timestamps
    async fn insert(&self, author: UserId, draft: &NewIdea) -> Result<Idea>;

    /// Retrieve an idea by id
    async fn find_by_id(&self, id: IdeaId) -> Result<Option<Idea>>;

    /// All ideas, in no particular order
    async fn list_all(&self) -> Result<Vec<Idea>>;

    /// Replace a stored idea with the given record
    ///
    /// Fails with `NotFound` if the idea no longer exists.
    async fn update(&self, idea: &Idea) -> Result<()>;

    /// Delete an idea; returns whether a record was removed
    async fn delete(&self, id: IdeaId) -> Result<bool>;

    /// Total number of ideas
    async fn count(&self) -> Result<u64>;
}

/// Store of vote records, the single writer for the (idea, user) uniqueness
/// invariant
///
/// The store enforces at most one record per (idea, user) pair. All
/// mutations go through [`VoteRepository::compare_and_swap`], which is the
/// serialization point for concurrent vote transitions: implementations
/// must execute it atomically per key (row lock, atomic upsert, or map
/// entry lock), never through process-wide locking.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// The current vote record for a pair, if any
    async fn find(&self, idea: IdeaId, user: UserId) -> Result<Option<Vote>>;

    /// Atomically transition the vote state for (idea, user)
    ///
    /// Succeeds only when the stored state still matches `expected`
    /// (`None` meaning no record). `desired = None` deletes the record,
    /// `desired = Some(t)` creates it or updates its type in place.
    /// Returns `false` when a concurrent transition won the race; the
    /// caller re-reads and retries.
    async fn compare_and_swap(
        &self,
        idea: IdeaId,
        user: UserId,
        expected: Option<VoteType>,
        desired: Option<VoteType>,
    ) -> Result<bool>;

    /// Aggregate count of votes of one type for an idea
    async fn count_by_type(&self, idea: IdeaId, vote_type: VoteType) -> Result<u64>;

    /// Drop all vote records for an idea (cascade on idea deletion)
    async fn delete_for_idea(&self, idea: IdeaId) -> Result<()>;

    /// Total number of vote records across all ideas
    async fn count_all(&self) -> Result<u64>;
}

/// Store of comments
///
/// Comment CRUD is simple and keeps no counters to reconcile; only the
/// per-idea count feeds the ranking core.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a new comment, assigning its id and timestamp
    async fn insert(&self, idea: IdeaId, author: UserId, body: &str) -> Result<Comment>;

    /// Retrieve a comment by id
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>>;

    /// Comments for an idea, newest first
    async fn list_for_idea(&self, idea: IdeaId) -> Result<Vec<Comment>>;

    /// Number of comments on an idea
    async fn count_for_idea(&self, idea: IdeaId) -> Result<u64>;

    /// Delete a comment; returns whether a record was removed
    async fn delete(&self, id: CommentId) -> Result<bool>;

    /// Drop all comments for an idea (cascade on idea deletion)
    async fn delete_for_idea(&self, idea: IdeaId) -> Result<()>;

    /// Total number of comments across all ideas
    async fn count_all(&self) -> Result<u64>;
}

/// Lookup into the externally-managed user population
///
/// Identity resolution happens upstream; the core only needs to check that
/// a supplied id maps to a known user and to read display data.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a user id to its profile, if known
    async fn resolve(&self, id: UserId) -> Result<Option<UserProfile>>;

    /// Total number of known users
    async fn count(&self) -> Result<u64>;
}
