//! Async read-through cache with TTL support.
//!
//! Storage sits behind a `tokio::sync::RwLock`. Read-through population goes
//! through a per-key flight mutex so that concurrent misses on one key run the
//! populate function once; the remaining callers wait and then observe the
//! stored value.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::debug;

use super::config::CacheConfig;
use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

/// Internal storage entry with metadata for expiry.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

type FlightMap<K> = HashMap<K, Arc<AsyncMutex<()>>>;

/// Async cache with TTL expiry and single-flight read-through population.
///
/// # Type Parameters
///
/// * `K` - Key type (must implement `Eq + Hash + Clone`)
/// * `V` - Value type (must implement `Clone`)
/// * `C` - Clock type for time operations (defaults to `SystemClock`)
///
/// # Examples
///
/// ```
/// use matchfeed_common::cache::{AsyncCache, CacheConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let cache: AsyncCache<String, i32> = AsyncCache::new(CacheConfig::default());
///
///     let value = cache
///         .get_or_try_insert_with("key".to_string(), || async { Ok::<_, String>(42) })
///         .await;
///     assert_eq!(value, Ok(42));
///     assert_eq!(cache.get(&"key".to_string()).await, Some(42));
/// }
/// ```
pub struct AsyncCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    storage: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    flights: Arc<Mutex<FlightMap<K>>>,
    config: CacheConfig,
    metrics: MetricsCollector,
    clock: C,
}

impl<K, V> AsyncCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a new async cache with the specified configuration and default
    /// system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> AsyncCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    /// Creates a new async cache with the specified configuration and clock.
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            flights: Arc::new(Mutex::new(HashMap::new())),
            config,
            metrics: MetricsCollector::new(),
            clock,
        }
    }

    /// Returns the configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Inserts a key-value pair, replacing any previous value and restarting
    /// its TTL.
    pub async fn insert(&self, key: K, value: V) {
        let entry = CacheEntry { value, inserted_at: self.clock.now() };
        self.storage.write().await.insert(key, entry);
        self.metrics.record_insert();
    }

    /// Retrieves a value from the cache by key.
    ///
    /// Returns `None` if the key doesn't exist or the entry has expired.
    /// Expired entries are removed on the way out.
    pub async fn get(&self, key: &K) -> Option<V> {
        let value = self.lookup(key).await;
        if value.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        value
    }

    /// Returns the cached value for `key`, or runs `populate`, stores its
    /// result and returns it.
    ///
    /// Concurrent callers missing on the same key share one `populate` run.
    /// An `Err` from `populate` is handed back to the caller that ran it and
    /// nothing is stored, so the next call retries population.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, populate: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let flight = self.join_flight(&key);
        let result = {
            let _in_flight = flight.lock().await;

            // Another caller may have populated the entry while we waited.
            if let Some(value) = self.lookup(&key).await {
                Ok(value)
            } else {
                debug!("cache miss, running populate");
                match populate().await {
                    Ok(value) => {
                        self.metrics.record_population(true);
                        self.insert(key.clone(), value.clone()).await;
                        Ok(value)
                    }
                    Err(err) => {
                        self.metrics.record_population(false);
                        debug!("cache populate failed, entry left empty");
                        Err(err)
                    }
                }
            }
        };
        self.leave_flight(&key, &flight);

        result
    }

    /// Removes and returns a value from the cache.
    pub async fn remove(&self, key: &K) -> Option<V> {
        self.storage.write().await.remove(key).map(|entry| entry.value)
    }

    /// Checks if a key exists in the cache and is not expired.
    pub async fn contains_key(&self, key: &K) -> bool {
        let storage = self.storage.read().await;
        storage.get(key).is_some_and(|entry| !self.is_expired(entry))
    }

    /// Returns the current number of entries in the cache.
    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    /// Returns `true` if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.storage.read().await.is_empty()
    }

    /// Clears all entries from the cache.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }

    /// Removes all expired entries and returns the count of removed entries.
    pub async fn cleanup_expired(&self) -> usize {
        let mut storage = self.storage.write().await;
        let before = storage.len();
        storage.retain(|_, entry| !self.is_expired(entry));
        let removed = before - storage.len();

        for _ in 0..removed {
            self.metrics.record_expiration();
        }
        removed
    }

    /// Returns current cache statistics.
    ///
    /// Note: This method uses a non-blocking read. If the lock is currently
    /// held, the size will be reported as 0 in the snapshot.
    pub fn stats(&self) -> CacheStats {
        let size = self.storage.try_read().map(|s| s.len()).unwrap_or(0);
        self.metrics.snapshot(size)
    }

    /// Fresh value for `key` without touching hit/miss counters.
    async fn lookup(&self, key: &K) -> Option<V> {
        {
            let storage = self.storage.read().await;
            match storage.get(key) {
                Some(entry) if !self.is_expired(entry) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut storage = self.storage.write().await;
        // Re-check under the write lock; a fresh insert may have landed.
        match storage.get(key) {
            Some(entry) if !self.is_expired(entry) => Some(entry.value.clone()),
            Some(_) => {
                storage.remove(key);
                self.metrics.record_expiration();
                None
            }
            None => None,
        }
    }

    fn join_flight(&self, key: &K) -> Arc<AsyncMutex<()>> {
        let mut flights = self.flights.lock();
        Arc::clone(flights.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))))
    }

    fn leave_flight(&self, key: &K, flight: &Arc<AsyncMutex<()>>) {
        let mut flights = self.flights.lock();
        // One reference lives in the map and one is ours; anything more is a
        // caller still queued on this flight.
        if Arc::strong_count(flight) <= 2 {
            flights.remove(key);
        }
    }

    /// Checks if an entry has expired based on TTL configuration.
    fn is_expired(&self, entry: &CacheEntry<V>) -> bool {
        self.config
            .ttl
            .is_some_and(|ttl| self.clock.now().duration_since(entry.inserted_at) > ttl)
    }
}

impl<K, V, C> Clone for AsyncCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            flights: Arc::clone(&self.flights),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}
