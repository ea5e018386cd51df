//! In-memory idea store

use crate::domain::error::{Error, Result};
use crate::domain::ports::IdeaRepository;
use crate::domain::types::{Idea, IdeaId, NewIdea, UserId};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// DashMap-backed idea repository
#[derive(Default)]
pub struct MemoryIdeaRepository {
    ideas: DashMap<IdeaId, Idea>,
    next_id: AtomicU64,
}

impl MemoryIdeaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdeaRepository for MemoryIdeaRepository {
    async fn insert(&self, author: UserId, draft: &NewIdea) -> Result<Idea> {
        let id = IdeaId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let now = Utc::now();
        let idea = Idea {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            tags: draft.tags.clone(),
            images: draft.images.clone(),
            author,
            created_at: now,
            updated_at: now,
        };
        self.ideas.insert(id, idea.clone());
        Ok(idea)
    }

    async fn find_by_id(&self, id: IdeaId) -> Result<Option<Idea>> {
        Ok(self.ideas.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_all(&self) -> Result<Vec<Idea>> {
        Ok(self.ideas.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn update(&self, idea: &Idea) -> Result<()> {
        match self.ideas.get_mut(&idea.id) {
            Some(mut entry) => {
                *entry = idea.clone();
                Ok(())
            }
            None => Err(Error::not_found(format!("idea {}", idea.id))),
        }
    }

    async fn delete(&self, id: IdeaId) -> Result<bool> {
        Ok(self.ideas.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.ideas.len() as u64)
    }
}
