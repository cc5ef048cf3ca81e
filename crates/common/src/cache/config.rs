//! Cache configuration types
//!
//! The cache holds a handful of long-lived entries, so the only knob is the
//! time-to-live after which an entry behaves as a miss.

use std::time::Duration;

/// Configuration for cache behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for entries (None = no expiration)
    pub ttl: Option<Duration>,
}

impl CacheConfig {
    /// Quick preset for TTL-based cache
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use matchfeed_common::cache::CacheConfig;
    ///
    /// let config = CacheConfig::ttl(Duration::from_secs(3600));
    /// assert_eq!(config.ttl, Some(Duration::from_secs(3600)));
    /// ```
    pub fn ttl(duration: Duration) -> Self {
        Self { ttl: Some(duration) }
    }

    /// Entries never expire; they live until removed or cleared
    pub fn no_expiry() -> Self {
        Self { ttl: None }
    }
}
