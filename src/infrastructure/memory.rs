//! In-memory implementations of the repository ports
//!
//! Authoritative single-instance stores backed by `DashMap`. The vote store
//! enforces the (idea, user) uniqueness invariant through per-key atomic
//! compare-and-swap; a relational backend would use a unique constraint and
//! row-level locking behind the same port.

mod comments;
mod ideas;
mod users;
mod votes;

pub use comments::MemoryCommentRepository;
pub use ideas::MemoryIdeaRepository;
pub use users::MemoryUserDirectory;
pub use votes::MemoryVoteRepository;
