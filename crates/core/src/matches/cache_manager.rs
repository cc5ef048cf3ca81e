//! Match feed cache manager - read-through cache of recent matches
//!
//! The manager owns one cache slot holding the most recent matches (newest
//! first) and one lock. Every path that may populate or rewrite the slot
//! holds the lock for its whole critical section, store round-trips
//! included, so mutations apply in some serial order and never lose updates.
//!
//! Queries filtered by network skip both the lock and the cache and go
//! straight to the store; their results are never cached.
//!
//! Neither lock acquisition nor store calls time out.

use std::sync::Arc;
use std::time::Duration;

use matchfeed_common::cache::{AsyncCache, CacheConfig, CacheStats};
use matchfeed_common::sync::AsyncLock;
use matchfeed_common::time::{Clock, SystemClock};
use matchfeed_domain::constants::MATCHES_CACHE_KEY;
use matchfeed_domain::{
    AccessLogRecord, Config, MatchCacheConfig, MatchFeedError, MatchRecord, ObjectId, Result,
    SprtConfig,
};
use tracing::{debug, info, instrument, warn};

use super::ports::MatchStore;
use crate::stats::StatsEngine;

/// Result of [`MatchCacheManager::push_new_match_if_changed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The store's latest match was new and now leads the cached feed
    Pushed,
    /// The cached feed already starts with the store's latest match
    UpToDate,
}

/// Read-through cache of the match feed with incremental stat updates.
///
/// Construct once at startup and share it (`Arc`) with every consumer.
pub struct MatchCacheManager<C = SystemClock>
where
    C: Clock + Clone,
{
    store: Arc<dyn MatchStore>,
    cache: AsyncCache<&'static str, Vec<MatchRecord>, C>,
    lock: AsyncLock,
    stats: StatsEngine,
    batch_size: usize,
}

impl MatchCacheManager<SystemClock> {
    /// Create a manager backed by `store`.
    pub fn new(store: Arc<dyn MatchStore>, cache: &MatchCacheConfig, sprt: &SprtConfig) -> Self {
        Self::with_clock(store, cache, sprt, SystemClock)
    }

    /// Create a manager from the application configuration.
    pub fn from_config(store: Arc<dyn MatchStore>, config: &Config) -> Self {
        Self::new(store, &config.cache, &config.sprt)
    }
}

impl<C> MatchCacheManager<C>
where
    C: Clock + Clone,
{
    /// Create a manager whose cache expiry is measured with `clock`.
    pub fn with_clock(
        store: Arc<dyn MatchStore>,
        cache: &MatchCacheConfig,
        sprt: &SprtConfig,
        clock: C,
    ) -> Self {
        let cache_config = CacheConfig::ttl(Duration::from_secs(cache.ttl_seconds));
        Self {
            store,
            cache: AsyncCache::with_clock(cache_config, clock),
            lock: AsyncLock::new("match_cache"),
            stats: StatsEngine::from_config(sprt),
            batch_size: cache.batch_size.max(1),
        }
    }

    /// The most recent matches, newest first, at most `limit` of them.
    ///
    /// Without `network` the answer comes from the cached feed, which is
    /// populated from the store on first use. A `limit` above the cached
    /// batch size returns the whole cached feed. With `network` the store is
    /// queried directly for matches involving that network.
    ///
    /// # Errors
    /// Propagates store failures; no partial list is returned.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_matches(
        &self,
        limit: usize,
        network: Option<&str>,
    ) -> Result<Vec<MatchRecord>> {
        if let Some(network) = network {
            debug!(network, limit, "filtered match query bypasses the cache");
            return self.load_from_store(limit, Some(network)).await;
        }

        let _guard = self.lock.acquire().await;
        let mut matches = self.cached_matches().await?;
        matches.truncate(limit);
        Ok(matches)
    }

    /// Record one finished game of the cached match `match_id`.
    ///
    /// Bumps the game count and network1's win or loss count, recomputes
    /// that record's statistics and writes the feed back.
    ///
    /// # Errors
    /// `MatchFeedError::NotFound` when the match is not in the cached feed
    /// (the feed is left untouched), or a store failure while populating.
    #[instrument(level = "debug", skip(self))]
    pub async fn update_match_stats(&self, match_id: ObjectId, is_network1_win: bool) -> Result<()> {
        let _guard = self.lock.acquire().await;
        let mut matches = self.cached_matches().await?;

        let Some(index) = matches.iter().position(|record| record.id() == match_id) else {
            warn!(%match_id, "stats update for a match that is not in the cached feed");
            return Err(MatchFeedError::NotFound(format!(
                "match {match_id} is not in the cached feed"
            )));
        };

        let updated = self.stats.annotate(matches[index].entry.with_outcome(is_network1_win));
        debug!(
            %match_id,
            wins = updated.entry.network1_wins,
            losses = updated.entry.network1_losses,
            games = updated.entry.game_count,
            "match stats updated"
        );
        matches[index] = updated;

        self.cache.insert(MATCHES_CACHE_KEY, matches).await;
        Ok(())
    }

    /// Put the store's latest match for `network` at the head of the cached
    /// feed unless it is already there.
    ///
    /// # Errors
    /// `MatchFeedError::NotFound` when the store has no match for `network`,
    /// or a store failure.
    #[instrument(level = "debug", skip(self))]
    pub async fn push_new_match_if_changed(&self, network: &str) -> Result<PushOutcome> {
        let _guard = self.lock.acquire().await;
        let mut matches = self.cached_matches().await?;

        let latest = self
            .store
            .fetch_matches(1, Some(network))
            .await
            .inspect_err(|err| warn!(error = %err, network, "latest match query failed"))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                MatchFeedError::NotFound(format!("no match found for network {network}"))
            })?;

        if matches.first().is_some_and(|leader| leader.id() == latest.id) {
            debug!(match_id = %latest.id, "cached feed already up to date");
            return Ok(PushOutcome::UpToDate);
        }

        info!(match_id = %latest.id, network, "pushing new match into cache");
        matches.insert(0, self.stats.annotate(latest));
        self.cache.insert(MATCHES_CACHE_KEY, matches).await;
        Ok(PushOutcome::Pushed)
    }

    /// Access logs for `url` from the last seven days, oldest first.
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn fetch_access_logs(&self, url: &str) -> Result<Vec<AccessLogRecord>> {
        self.store.fetch_access_logs(url).await
    }

    /// Drop the cached feed; the next read populates it again.
    pub async fn invalidate(&self) {
        let _guard = self.lock.acquire().await;
        if self.cache.remove(&MATCHES_CACHE_KEY).await.is_some() {
            info!("match cache invalidated");
        }
    }

    /// Number of records currently cached, 0 when the slot is empty.
    ///
    /// Never populates the cache.
    pub async fn cached_len(&self) -> usize {
        let _guard = self.lock.acquire().await;
        self.cache.get(&MATCHES_CACHE_KEY).await.map_or(0, |matches| matches.len())
    }

    /// Hit, miss and population counters of the feed cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Read-through access to the cached feed. Callers hold `self.lock`.
    async fn cached_matches(&self) -> Result<Vec<MatchRecord>> {
        self.cache
            .get_or_try_insert_with(MATCHES_CACHE_KEY, || self.load_from_store(self.batch_size, None))
            .await
    }

    async fn load_from_store(
        &self,
        limit: usize,
        network: Option<&str>,
    ) -> Result<Vec<MatchRecord>> {
        let entries = self
            .store
            .fetch_matches(limit, network)
            .await
            .inspect_err(|err| warn!(error = %err, limit, network, "match query failed"))?;

        debug!(count = entries.len(), limit, network, "loaded matches from store");
        Ok(self.stats.annotate_all(entries))
    }
}
