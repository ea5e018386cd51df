//! Vote toggle state machine behavior

mod common;

use async_trait::async_trait;
use common::{board, draft, users};
use ideaboard::config::BoardConfig;
use ideaboard::context::BoardContext;
use ideaboard::domain::error::{Error, Result};
use ideaboard::domain::ports::VoteRepository;
use ideaboard::domain::types::{IdeaId, UserId, Vote, VoteType};
use ideaboard::infrastructure::memory::{
    MemoryCommentRepository, MemoryIdeaRepository, MemoryUserDirectory, MemoryVoteRepository,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[tokio::test]
async fn toggle_scenario_walks_all_three_transitions() {
    let (ctx, directory) = board();
    let [u1] = users(&directory);
    let idea = ctx.ideas.create_idea(u1.id, draft("Toggle me")).await.unwrap();

    // NONE -> UP
    let counts = ctx.votes.cast_vote(idea.id, u1.id, VoteType::Up).await.unwrap();
    assert_eq!((counts.upvotes, counts.downvotes), (1, 0));
    assert_eq!(
        ctx.votes.current_vote(idea.id, u1.id).await.unwrap(),
        Some(VoteType::Up)
    );

    // UP -> DOWN (type switch, in place)
    let counts = ctx.votes.cast_vote(idea.id, u1.id, VoteType::Down).await.unwrap();
    assert_eq!((counts.upvotes, counts.downvotes), (0, 1));

    // DOWN -> NONE (toggle-off)
    let counts = ctx.votes.cast_vote(idea.id, u1.id, VoteType::Down).await.unwrap();
    assert_eq!((counts.upvotes, counts.downvotes), (0, 0));
    assert_eq!(ctx.votes.current_vote(idea.id, u1.id).await.unwrap(), None);
}

#[tokio::test]
async fn casting_the_same_type_twice_round_trips_to_none() {
    let (ctx, directory) = board();
    let [u1, u2] = users(&directory);
    let idea = ctx.ideas.create_idea(u1.id, draft("Round trip")).await.unwrap();

    ctx.votes.cast_vote(idea.id, u2.id, VoteType::Up).await.unwrap();
    let baseline = ctx.votes.cast_vote(idea.id, u1.id, VoteType::Up).await.unwrap();

    let after = ctx.votes.cast_vote(idea.id, u1.id, VoteType::Up).await.unwrap();
    // Second identical cast removed u1's vote: back to u2's lone upvote.
    assert_eq!(after.upvotes, baseline.upvotes - 1);
    assert_eq!((after.upvotes, after.downvotes), (1, 0));
    assert_eq!(ctx.votes.current_vote(idea.id, u1.id).await.unwrap(), None);
}

#[tokio::test]
async fn remove_vote_is_a_no_op_without_a_vote() {
    let (ctx, directory) = board();
    let [u1] = users(&directory);
    let idea = ctx.ideas.create_idea(u1.id, draft("Nothing to remove")).await.unwrap();

    let counts = ctx.votes.remove_vote(idea.id, u1.id).await.unwrap();
    assert_eq!((counts.upvotes, counts.downvotes), (0, 0));
}

#[tokio::test]
async fn remove_vote_clears_any_state() {
    let (ctx, directory) = board();
    let [u1] = users(&directory);
    let idea = ctx.ideas.create_idea(u1.id, draft("Remove me")).await.unwrap();

    ctx.votes.cast_vote(idea.id, u1.id, VoteType::Down).await.unwrap();
    let counts = ctx.votes.remove_vote(idea.id, u1.id).await.unwrap();
    assert_eq!((counts.upvotes, counts.downvotes), (0, 0));
    assert_eq!(ctx.votes.current_vote(idea.id, u1.id).await.unwrap(), None);
}

#[tokio::test]
async fn unknown_idea_and_user_fail_with_not_found() {
    let (ctx, directory) = board();
    let [u1] = users(&directory);
    let idea = ctx.ideas.create_idea(u1.id, draft("Exists")).await.unwrap();

    let err = ctx
        .votes
        .cast_vote(IdeaId(9999), u1.id, VoteType::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    let stranger = UserId(uuid::Uuid::new_v4());
    let err = ctx
        .votes
        .cast_vote(idea.id, stranger, VoteType::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn wire_vote_type_is_rejected_defensively() {
    let (ctx, directory) = board();
    let [u1] = users(&directory);
    let idea = ctx.ideas.create_idea(u1.id, draft("Bad input")).await.unwrap();

    let counts = ctx.votes.cast_vote_raw(idea.id, u1.id, "UP").await.unwrap();
    assert_eq!(counts.upvotes, 1);

    let err = ctx
        .votes
        .cast_vote_raw(idea.id, u1.id, "sideways")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

/// Delegating vote store whose first `n` compare-and-swap calls lose
struct RacyVoteRepository {
    inner: MemoryVoteRepository,
    losses_left: AtomicUsize,
}

impl RacyVoteRepository {
    fn losing(n: usize) -> Self {
        Self {
            inner: MemoryVoteRepository::new(),
            losses_left: AtomicUsize::new(n),
        }
    }
}

#[async_trait]
impl VoteRepository for RacyVoteRepository {
    async fn find(&self, idea: IdeaId, user: UserId) -> Result<Option<Vote>> {
        self.inner.find(idea, user).await
    }

    async fn compare_and_swap(
        &self,
        idea: IdeaId,
        user: UserId,
        expected: Option<VoteType>,
        desired: Option<VoteType>,
    ) -> Result<bool> {
        if self
            .losses_left
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
        {
            return Ok(false);
        }
        self.inner.compare_and_swap(idea, user, expected, desired).await
    }

    async fn count_by_type(&self, idea: IdeaId, vote_type: VoteType) -> Result<u64> {
        self.inner.count_by_type(idea, vote_type).await
    }

    async fn delete_for_idea(&self, idea: IdeaId) -> Result<()> {
        self.inner.delete_for_idea(idea).await
    }

    async fn count_all(&self) -> Result<u64> {
        self.inner.count_all().await
    }
}

fn racy_board(losses: usize) -> (BoardContext, Arc<MemoryUserDirectory>) {
    let users = Arc::new(MemoryUserDirectory::new());
    let ctx = BoardContext::with_stores(
        BoardConfig::default(),
        Arc::new(MemoryIdeaRepository::new()),
        Arc::new(RacyVoteRepository::losing(losses)),
        Arc::new(MemoryCommentRepository::new()),
        users.clone(),
    )
    .unwrap();
    (ctx, users)
}

#[tokio::test]
async fn a_single_lost_race_is_retried_internally() {
    let (ctx, directory) = racy_board(1);
    let [u1] = users(&directory);
    let idea = ctx.ideas.create_idea(u1.id, draft("Contended")).await.unwrap();

    let counts = ctx.votes.cast_vote(idea.id, u1.id, VoteType::Up).await.unwrap();
    assert_eq!(counts.upvotes, 1);
}

#[tokio::test]
async fn persistent_races_surface_as_conflict() {
    let (ctx, directory) = racy_board(usize::MAX);
    let [u1] = users(&directory);
    let idea = ctx.ideas.create_idea(u1.id, draft("Hopeless")).await.unwrap();

    let err = ctx
        .votes
        .cast_vote(idea.id, u1.id, VoteType::Up)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}
