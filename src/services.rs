//! Service layer
//!
//! The operations controllers consume. `VoteService` owns the vote toggle
//! state machine, `CounterAggregator` and `RankingIndex` derive everything
//! else from it, and `InvalidationCoordinator` keeps the cache honest after
//! every mutation.

pub mod comments;
pub mod counters;
pub mod ideas;
pub mod invalidation;
pub mod ranking;
pub mod stats;
pub mod votes;

pub use comments::CommentService;
pub use counters::CounterAggregator;
pub use ideas::IdeaService;
pub use invalidation::InvalidationCoordinator;
pub use ranking::RankingIndex;
pub use stats::StatsService;
pub use votes::VoteService;
