//! Idea board core: vote state, derived rankings, and a bounded
//! partitioned cache
//!
//! Controllers, HTTP routing and identity resolution live outside this
//! crate; they consume the service layer through [`context::BoardContext`].

pub mod admin;
pub mod config;
pub mod context;
pub mod domain;
pub mod infrastructure;
pub mod services;
