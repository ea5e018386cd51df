//! Infrastructure layer: caching, in-memory stores, logging

pub mod cache;
pub mod logging;
pub mod memory;
