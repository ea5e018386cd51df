//! In-memory comment store

use crate::domain::error::Result;
use crate::domain::ports::CommentRepository;
use crate::domain::types::{Comment, CommentId, IdeaId, UserId};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// DashMap-backed comment repository
#[derive(Default)]
pub struct MemoryCommentRepository {
    comments: DashMap<CommentId, Comment>,
    next_id: AtomicU64,
}

impl MemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn insert(&self, idea: IdeaId, author: UserId, body: &str) -> Result<Comment> {
        let id = CommentId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let comment = Comment {
            id,
            idea_id: idea,
            author,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        self.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>> {
        Ok(self.comments.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_for_idea(&self, idea: IdeaId) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|entry| entry.idea_id == idea)
            .map(|entry| entry.value().clone())
            .collect();
        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(comments)
    }

    async fn count_for_idea(&self, idea: IdeaId) -> Result<u64> {
        Ok(self
            .comments
            .iter()
            .filter(|entry| entry.idea_id == idea)
            .count() as u64)
    }

    async fn delete(&self, id: CommentId) -> Result<bool> {
        Ok(self.comments.remove(&id).is_some())
    }

    async fn delete_for_idea(&self, idea: IdeaId) -> Result<()> {
        self.comments.retain(|_, comment| comment.idea_id != idea);
        Ok(())
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(self.comments.len() as u64)
    }
}
