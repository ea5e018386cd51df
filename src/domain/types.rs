//! Core domain types for the idea board
//!
//! Ideas, votes, and comments are the three entity classes; everything else
//! here is derived read models and the identifiers that tie them together.
//! The central consistency invariant lives on [`Vote`]: at most one vote per
//! (idea, user) pair at any time.

use crate::domain::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Identifier of an idea (sequential, assigned by the idea store)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IdeaId(pub u64);

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a vote record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VoteId(pub u64);

/// Identifier of a comment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user, as issued by the external identity provider
///
/// The core never authenticates; callers pass an already-resolved id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two vote directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Up,
    Down,
}

impl VoteType {
    /// The opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

impl FromStr for VoteType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(Error::invalid_argument(format!(
                "vote type must be \"up\" or \"down\", got {other:?}"
            ))),
        }
    }
}

/// Supported list orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Creation timestamp descending, newest first
    Newest,
    /// Total vote count descending
    Votes,
    /// Comment count descending
    Comments,
}

impl SortOrder {
    /// All orderings, in the order the board presents them
    pub const ALL: [Self; 3] = [Self::Newest, Self::Votes, Self::Comments];
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Newest => write!(f, "newest"),
            Self::Votes => write!(f, "votes"),
            Self::Comments => write!(f, "comments"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "votes" => Ok(Self::Votes),
            "comments" => Ok(Self::Comments),
            other => Err(Error::invalid_argument(format!(
                "sort order must be \"newest\", \"votes\" or \"comments\", got {other:?}"
            ))),
        }
    }
}

/// An idea on the board
///
/// The core treats this as an immutable read model plus derived counters;
/// the persistence collaborator owns the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Idea {
    pub id: IdeaId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single vote record
///
/// Invariant: at most one record exists per (idea, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub id: VoteId,
    pub idea_id: IdeaId,
    pub user_id: UserId,
    pub vote_type: VoteType,
    pub cast_at: DateTime<Utc>,
}

/// A comment on an idea
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub idea_id: IdeaId,
    pub author: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A user profile as resolved through the identity directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
}

/// Derived per-idea vote counters
///
/// Always equal to the authoritative store's per-type counts; recomputed or
/// cached, never hand-edited.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteCounts {
    pub upvotes: u64,
    pub downvotes: u64,
}

impl VoteCounts {
    /// Total raw vote count, the score behind the `votes` ordering
    pub fn total(&self) -> u64 {
        self.upvotes + self.downvotes
    }
}

/// Input for creating an idea
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewIdea {
    #[validate(length(min = 5, max = 200, message = "title must be 5-200 characters"))]
    pub title: String,
    #[validate(length(
        min = 10,
        max = 5000,
        message = "description must be 10-5000 characters"
    ))]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Input for updating an idea; replaces all editable fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IdeaUpdate {
    #[validate(length(min = 5, max = 200, message = "title must be 5-200 characters"))]
    pub title: String,
    #[validate(length(
        min = 10,
        max = 5000,
        message = "description must be 10-5000 characters"
    ))]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// An idea as presented to a viewer: record fields plus derived counters
/// and the viewer's own vote when a viewer is given
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdeaView {
    pub id: IdeaId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub upvotes: u64,
    pub downvotes: u64,
    pub comment_count: u64,
    pub user_vote: Option<VoteType>,
}

/// Board-wide aggregate totals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardStats {
    pub total_ideas: u64,
    pub total_votes: u64,
    pub total_users: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_type_parses_case_insensitively() {
        assert_eq!("up".parse::<VoteType>().unwrap(), VoteType::Up);
        assert_eq!("DOWN".parse::<VoteType>().unwrap(), VoteType::Down);
        assert!("sideways".parse::<VoteType>().is_err());
    }

    #[test]
    fn vote_type_round_trips_through_display() {
        for t in [VoteType::Up, VoteType::Down] {
            assert_eq!(t.to_string().parse::<VoteType>().unwrap(), t);
        }
    }

    #[test]
    fn sort_order_rejects_unknown_keys() {
        assert_eq!("votes".parse::<SortOrder>().unwrap(), SortOrder::Votes);
        let err = "popular".parse::<SortOrder>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn vote_counts_total_sums_both_directions() {
        let counts = VoteCounts {
            upvotes: 3,
            downvotes: 2,
        };
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn new_idea_bounds_are_enforced() {
        let bad = NewIdea {
            title: "hi".to_string(),
            description: "short but long enough".to_string(),
            tags: vec![],
            images: vec![],
        };
        assert!(bad.validate().is_err());

        let ok = NewIdea {
            title: "A proper title".to_string(),
            description: "A description that satisfies the lower bound".to_string(),
            tags: vec!["infra".to_string()],
            images: vec![],
        };
        assert!(ok.validate().is_ok());
    }
}
