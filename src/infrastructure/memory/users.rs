//! In-memory user directory
//!
//! Stands in for the identity provider in tests and single-instance
//! deployments. Registration mints the provider-style UUID subject.

use crate::domain::error::Result;
use crate::domain::ports::UserDirectory;
use crate::domain::types::{UserId, UserProfile};
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

/// DashMap-backed user directory
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: DashMap<UserId, UserProfile>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user and return the minted profile
    pub fn register(&self, username: &str) -> UserProfile {
        let profile = UserProfile {
            id: UserId(Uuid::new_v4()),
            username: username.to_string(),
        };
        self.users.insert(profile.id, profile.clone());
        profile
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn resolve(&self, id: UserId) -> Result<Option<UserProfile>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.users.len() as u64)
    }
}
