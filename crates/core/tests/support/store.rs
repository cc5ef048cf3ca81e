//! Mock match store for cache manager tests
//!
//! Keeps entries in memory, counts match queries and can be switched into a
//! failing state or made slow to widen race windows.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use matchfeed_core::MatchStore;
use matchfeed_domain::{
    AccessLogRecord, MatchEntry, MatchFeedError, NetworkDescriptor, ObjectId,
    Result as DomainResult,
};

/// In-memory mock for `MatchStore`.
#[derive(Default, Clone)]
pub struct MockMatchStore {
    entries: Arc<Mutex<Vec<MatchEntry>>>,
    access_logs: Arc<Mutex<Vec<AccessLogRecord>>>,
    match_queries: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl MockMatchStore {
    pub fn new(entries: Vec<MatchEntry>) -> Self {
        Self { entries: Arc::new(Mutex::new(entries)), ..Self::default() }
    }

    /// Every match query sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_access_logs(self, logs: Vec<AccessLogRecord>) -> Self {
        *self.access_logs.lock().unwrap() = logs;
        self
    }

    pub fn push_entry(&self, entry: MatchEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn match_queries(&self) -> usize {
        self.match_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchStore for MockMatchStore {
    async fn fetch_matches(
        &self,
        limit: usize,
        network: Option<&str>,
    ) -> DomainResult<Vec<MatchEntry>> {
        self.match_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(MatchFeedError::StoreUnavailable("mock store offline".into()));
        }

        let mut entries: Vec<MatchEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| network.is_none_or(|hash| entry.involves(hash)))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn fetch_access_logs(&self, url: &str) -> DomainResult<Vec<AccessLogRecord>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MatchFeedError::StoreUnavailable("mock store offline".into()));
        }
        Ok(self.access_logs.lock().unwrap().iter().filter(|log| log.url == url).cloned().collect())
    }
}

/// Id stamped `seconds` after 2018-03-01, so larger `seconds` sort newer.
///
/// Deterministic: the same `seconds` always yields the same id.
pub fn id_at(seconds: i64) -> ObjectId {
    ObjectId::from_datetime(Utc.timestamp_opt(1_519_862_400 + seconds, 0).unwrap())
}

/// Match between `network1` and `network2` with the given score.
pub fn entry(
    id: ObjectId,
    network1: &str,
    network2: &str,
    wins: u32,
    losses: u32,
) -> MatchEntry {
    let mut entry =
        MatchEntry::new(id, NetworkDescriptor::new(network1), NetworkDescriptor::new(network2));
    entry.network1_wins = wins;
    entry.network1_losses = losses;
    entry.game_count = wins + losses;
    entry
}

/// `count` matches, one second apart, alternating between two network pairs.
pub fn seeded_entries(count: usize) -> Vec<MatchEntry> {
    (0..count)
        .map(|i| {
            let (n1, n2) = if i % 2 == 0 { ("aaaa", "bbbb") } else { ("cccc", "dddd") };
            entry(id_at(i as i64), n1, n2, (i % 7) as u32, (i % 5) as u32)
        })
        .collect()
}
