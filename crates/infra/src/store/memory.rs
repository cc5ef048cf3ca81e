//! In-memory match store.
//!
//! Holds the three collections a match feed reads from: networks keyed by
//! hash, matches referencing networks by hash, and request logs. Queries
//! join each match with both networks and strip the store-internal network
//! fields on the way out. A match whose network is missing is skipped, the
//! same as an inner join would.
//!
//! Used for tests and local development; it can be switched into an
//! unavailable state to exercise outage handling.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matchfeed_common::time::{Clock, SystemClock};
use matchfeed_core::MatchStore;
use matchfeed_domain::constants::ACCESS_LOG_WINDOW;
use matchfeed_domain::{
    AccessLogRecord, MatchEntry, MatchFeedError, NetworkDescriptor, ObjectId,
    Result as DomainResult,
};
use parking_lot::RwLock;
use tracing::{debug, warn};

/// A network as stored, including fields never served to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRow {
    /// Store-internal id
    pub id: ObjectId,
    /// Address the network was uploaded from
    pub ip: Option<String>,
    /// Served fields
    pub descriptor: NetworkDescriptor,
}

impl NetworkRow {
    /// Fresh row for `hash` with no upload address.
    pub fn new(hash: impl Into<String>) -> Self {
        Self { id: ObjectId::new(), ip: None, descriptor: NetworkDescriptor::new(hash) }
    }

    /// Network hash, the join key for match rows.
    pub fn hash(&self) -> &str {
        &self.descriptor.hash
    }
}

/// A match as stored: both sides referenced by network hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub id: ObjectId,
    /// Hash of the first network
    pub network1: String,
    /// Hash of the second network
    pub network2: String,
    pub network1_wins: u32,
    pub network1_losses: u32,
    pub game_count: u32,
    pub number_to_play: u32,
    pub is_test: bool,
}

impl MatchRow {
    /// Unplayed match between two hashes.
    pub fn new(id: ObjectId, network1: impl Into<String>, network2: impl Into<String>) -> Self {
        Self {
            id,
            network1: network1.into(),
            network2: network2.into(),
            network1_wins: 0,
            network1_losses: 0,
            game_count: 0,
            number_to_play: 0,
            is_test: false,
        }
    }

    fn involves(&self, hash: &str) -> bool {
        self.network1 == hash || self.network2 == hash
    }
}

#[derive(Debug, Clone)]
struct LogRow {
    id: ObjectId,
    url: String,
    time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Collections {
    networks: Vec<NetworkRow>,
    matches: Vec<MatchRow>,
    logs: Vec<LogRow>,
}

impl Collections {
    fn network(&self, hash: &str) -> Option<NetworkDescriptor> {
        self.networks.iter().find(|row| row.hash() == hash).map(|row| row.descriptor.clone())
    }

    fn join(&self, row: &MatchRow) -> Option<MatchEntry> {
        let network1 = self.network(&row.network1)?;
        let network2 = self.network(&row.network2)?;
        Some(MatchEntry {
            id: row.id,
            network1,
            network2,
            network1_wins: row.network1_wins,
            network1_losses: row.network1_losses,
            game_count: row.game_count,
            number_to_play: row.number_to_play,
            is_test: row.is_test,
        })
    }
}

/// [`MatchStore`] over in-process collections.
pub struct InMemoryMatchStore<C = SystemClock>
where
    C: Clock,
{
    collections: RwLock<Collections>,
    unavailable: AtomicBool,
    match_queries: AtomicUsize,
    clock: C,
}

impl InMemoryMatchStore<SystemClock> {
    /// Empty store whose log window follows the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryMatchStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryMatchStore<C>
where
    C: Clock,
{
    /// Store whose access-log window is measured against `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
            unavailable: AtomicBool::new(false),
            match_queries: AtomicUsize::new(0),
            clock,
        }
    }

    /// Insert a network, replacing any row with the same hash.
    pub fn insert_network(&self, row: NetworkRow) {
        let mut collections = self.collections.write();
        collections.networks.retain(|existing| existing.hash() != row.hash());
        collections.networks.push(row);
    }

    /// Insert a match, replacing any row with the same id.
    pub fn insert_match(&self, row: MatchRow) {
        let mut collections = self.collections.write();
        collections.matches.retain(|existing| existing.id != row.id);
        collections.matches.push(row);
    }

    /// Log a request for `url`. Without `time` the log's time is taken from
    /// its id.
    pub fn insert_access_log(
        &self,
        id: ObjectId,
        url: impl Into<String>,
        time: Option<DateTime<Utc>>,
    ) {
        self.collections.write().logs.push(LogRow { id, url: url.into(), time });
    }

    /// Make every query fail with `StoreUnavailable` until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Match queries served so far, failed ones included.
    pub fn match_query_count(&self) -> usize {
        self.match_queries.load(Ordering::SeqCst)
    }

    fn ensure_available(&self, operation: &str) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            warn!(operation, "in-memory store marked unavailable");
            return Err(MatchFeedError::StoreUnavailable(format!(
                "{operation}: store is unavailable"
            )));
        }
        Ok(())
    }

    /// Smallest id an access log must exceed to fall inside the window.
    fn access_log_floor(&self) -> ObjectId {
        let since = self.clock.system_time().checked_sub(ACCESS_LOG_WINDOW).unwrap_or(UNIX_EPOCH);
        ObjectId::from_datetime(DateTime::<Utc>::from(since))
    }
}

#[async_trait]
impl<C> MatchStore for InMemoryMatchStore<C>
where
    C: Clock,
{
    async fn fetch_matches(
        &self,
        limit: usize,
        network: Option<&str>,
    ) -> DomainResult<Vec<MatchEntry>> {
        self.match_queries.fetch_add(1, Ordering::SeqCst);
        self.ensure_available("matches.fetch")?;

        let collections = self.collections.read();
        let mut entries: Vec<MatchEntry> = collections
            .matches
            .iter()
            .filter(|row| network.is_none_or(|hash| row.involves(hash)))
            .filter_map(|row| collections.join(row))
            .collect();
        drop(collections);

        entries.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        entries.truncate(limit);

        debug!(count = entries.len(), limit, network, "matches fetched");
        Ok(entries)
    }

    async fn fetch_access_logs(&self, url: &str) -> DomainResult<Vec<AccessLogRecord>> {
        self.ensure_available("access_logs.fetch")?;

        let floor = self.access_log_floor();
        let mut logs: Vec<AccessLogRecord> = self
            .collections
            .read()
            .logs
            .iter()
            .filter(|row| row.url == url && row.id > floor)
            .map(|row| AccessLogRecord::new(row.id, row.url.clone(), row.time))
            .collect();

        logs.sort_unstable_by_key(|log| log.id);
        Ok(logs)
    }
}
