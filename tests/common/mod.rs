//! Shared fixtures for the integration tests
#![allow(dead_code)]

use ideaboard::config::BoardConfig;
use ideaboard::context::BoardContext;
use ideaboard::domain::types::{NewIdea, UserProfile};
use ideaboard::infrastructure::memory::MemoryUserDirectory;
use std::sync::Arc;

/// A board over the in-memory stores with default cache policy
pub fn board() -> (BoardContext, Arc<MemoryUserDirectory>) {
    BoardContext::new(BoardConfig::default()).expect("context assembles")
}

/// A board with caching disabled
pub fn board_without_cache() -> (BoardContext, Arc<MemoryUserDirectory>) {
    let mut config = BoardConfig::default();
    config.cache.enabled = false;
    BoardContext::new(config).expect("context assembles")
}

/// A valid idea draft
pub fn draft(title: &str) -> NewIdea {
    NewIdea {
        title: title.to_string(),
        description: format!("A sufficiently long description for {title}"),
        tags: vec!["test".to_string()],
        images: vec![],
    }
}

/// Register `N` users named user0..user(N-1)
pub fn users<const N: usize>(directory: &MemoryUserDirectory) -> [UserProfile; N] {
    std::array::from_fn(|i| directory.register(&format!("user{i}")))
}
