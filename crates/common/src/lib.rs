//! Modular common utilities shared across MatchFeed crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `runtime`: async infrastructure (cache, lock, clock)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod cache;
#[cfg(feature = "runtime")]
pub mod sync;
#[cfg(feature = "runtime")]
pub mod time;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use cache::{AsyncCache, CacheConfig, CacheStats};
#[cfg(feature = "runtime")]
pub use sync::{AsyncLock, LockGuard};
#[cfg(feature = "runtime")]
pub use time::{Clock, MockClock, SystemClock};
