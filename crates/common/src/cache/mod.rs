//! Async read-through cache with TTL-based expiration
//!
//! # Features
//!
//! - **Async**: storage behind `tokio::sync::RwLock`, safe to share via `Arc`
//! - **Read-through**: [`AsyncCache::get_or_try_insert_with`] populates on a
//!   miss and never stores a failed population
//! - **Single-flight**: concurrent misses on one key run the populate
//!   function once
//! - **TTL support**: expired entries behave as misses
//! - **Metrics tracking**: hit/miss/insert/expiration/population counters
//! - **Testable**: Clock abstraction for deterministic time-based testing
//!
//! # Examples
//!
//! ## TTL-based Cache
//! ```
//! use std::time::Duration;
//!
//! use matchfeed_common::cache::{AsyncCache, CacheConfig};
//!
//! let cache: AsyncCache<String, String> =
//!     AsyncCache::new(CacheConfig::ttl(Duration::from_secs(3600)));
//! ```
//!
//! ## Cache Statistics
//! ```
//! use matchfeed_common::cache::{AsyncCache, CacheConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cache: AsyncCache<String, i32> = AsyncCache::new(CacheConfig::default());
//!
//! cache.insert("key1".to_string(), 1).await;
//! let _ = cache.get(&"key1".to_string()).await;
//!
//! let stats = cache.stats();
//! assert_eq!(stats.hits, 1);
//! # }
//! ```

mod async_core;
mod config;
mod stats;

// Re-export public API
pub use async_core::AsyncCache;
pub use config::CacheConfig;
pub use stats::CacheStats;
