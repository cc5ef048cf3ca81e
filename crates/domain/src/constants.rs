//! Domain constants
//!
//! Centralized location for defaults shared by configuration and services.

use std::time::Duration;

/// Cache key holding the full match list
pub const MATCHES_CACHE_KEY: &str = "matches";

/// Number of most recent matches loaded into the cache on population
pub const DEFAULT_MATCH_BATCH_SIZE: usize = 100;

/// Cache expiry horizon: one year, i.e. the process lifetime in practice
pub const DEFAULT_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Access log queries only look this far back
pub const ACCESS_LOG_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// SPRT defaults: H0 = no gain, H1 = +35 Elo, 5% error rates both ways
pub const DEFAULT_SPRT_ELO0: f64 = 0.0;
pub const DEFAULT_SPRT_ELO1: f64 = 35.0;
pub const DEFAULT_SPRT_ALPHA: f64 = 0.05;
pub const DEFAULT_SPRT_BETA: f64 = 0.05;
