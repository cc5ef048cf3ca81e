//! # MatchFeed Core
//!
//! Business logic of the match feed - no infrastructure dependencies.
//!
//! This crate contains:
//! - Match statistics (SPRT verdicts, progress estimates, win rates)
//! - The match store port
//! - The match cache manager serving and updating the cached feed
//!
//! ## Architecture Principles
//! - Only depends on `matchfeed-common` and `matchfeed-domain`
//! - No database or HTTP code
//! - All storage reached through the [`MatchStore`] trait

pub mod matches;
pub mod stats;

pub use matches::{MatchCacheManager, MatchStore, PushOutcome};
pub use stats::{win_rate, StatsEngine};
