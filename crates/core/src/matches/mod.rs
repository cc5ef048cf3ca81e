//! Cached match feed

pub mod cache_manager;
pub mod ports;

pub use cache_manager::{MatchCacheManager, PushOutcome};
pub use ports::MatchStore;
