//! Port interfaces for the match store
//!
//! These traits define the boundary between the match feed logic and the
//! persistent store that owns matches, networks and access logs.

use async_trait::async_trait;
use matchfeed_domain::{AccessLogRecord, MatchEntry, Result};

/// Read access to stored matches and access logs
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Most recent matches first, at most `limit` of them.
    ///
    /// Each entry has both networks joined in with internal fields removed.
    /// With `network` set, only matches where that network plays on either
    /// side are returned.
    ///
    /// # Errors
    /// `MatchFeedError::StoreUnavailable` when the store cannot be queried.
    async fn fetch_matches(&self, limit: usize, network: Option<&str>) -> Result<Vec<MatchEntry>>;

    /// Access logs for exactly `url` from the trailing seven days, oldest
    /// first.
    ///
    /// # Errors
    /// `MatchFeedError::StoreUnavailable` when the store cannot be queried.
    async fn fetch_access_logs(&self, url: &str) -> Result<Vec<AccessLogRecord>>;
}
