//! Comment operations
//!
//! Simple CRUD with no counters to reconcile; only the per-idea count
//! feeds the ranking core, so mutations invalidate the idea detail and the
//! comment-ordered view and nothing else.

use crate::domain::error::{Error, Result};
use crate::domain::ports::{CommentRepository, IdeaRepository, UserDirectory};
use crate::domain::types::{Comment, CommentId, IdeaId, UserId};
use crate::services::invalidation::InvalidationCoordinator;
use std::sync::Arc;

const MAX_COMMENT_LEN: usize = 2000;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    ideas: Arc<dyn IdeaRepository>,
    users: Arc<dyn UserDirectory>,
    invalidation: Arc<InvalidationCoordinator>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        ideas: Arc<dyn IdeaRepository>,
        users: Arc<dyn UserDirectory>,
        invalidation: Arc<InvalidationCoordinator>,
    ) -> Self {
        Self {
            comments,
            ideas,
            users,
            invalidation,
        }
    }

    /// Add a comment to an idea
    pub async fn add_comment(
        &self,
        idea: IdeaId,
        author: UserId,
        body: &str,
    ) -> Result<Comment> {
        let body = body.trim();
        if body.is_empty() || body.len() > MAX_COMMENT_LEN {
            return Err(Error::invalid_argument(format!(
                "comment body must be 1-{MAX_COMMENT_LEN} characters"
            )));
        }
        if self.ideas.find_by_id(idea).await?.is_none() {
            return Err(Error::not_found(format!("idea {idea}")));
        }
        if self.users.resolve(author).await?.is_none() {
            return Err(Error::not_found(format!("user {author}")));
        }

        let comment = self.comments.insert(idea, author, body).await?;
        self.invalidation.after_comment_mutation(idea).await;
        Ok(comment)
    }

    /// Delete a comment; only its author may
    pub async fn delete_comment(&self, id: CommentId, editor: UserId) -> Result<()> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("comment {id}")))?;
        if comment.author != editor {
            return Err(Error::unauthorized(format!(
                "user {editor} is not the author of comment {id}"
            )));
        }
        self.comments.delete(id).await?;
        self.invalidation.after_comment_mutation(comment.idea_id).await;
        Ok(())
    }

    /// Comments on an idea, newest first
    pub async fn list_comments(&self, idea: IdeaId) -> Result<Vec<Comment>> {
        if self.ideas.find_by_id(idea).await?.is_none() {
            return Err(Error::not_found(format!("idea {idea}")));
        }
        self.comments.list_for_idea(idea).await
    }

    /// Number of comments on an idea
    pub async fn count_for(&self, idea: IdeaId) -> Result<u64> {
        self.comments.count_for_idea(idea).await
    }
}
