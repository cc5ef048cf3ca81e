//! Integration tests for cache module
//!
//! Tests read-through population, TTL support, and concurrent access patterns

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use matchfeed_common::cache::{AsyncCache, CacheConfig};
use matchfeed_common::time::MockClock;

/// Validates that a single long-lived slot behaves as a read-through cache.
///
/// # Test Steps
/// 1. Read the slot through `get_or_try_insert_with` (miss, populates)
/// 2. Overwrite the slot with `insert`
/// 3. Read again through `get_or_try_insert_with` (hit, populate not run)
#[tokio::test]
async fn test_single_slot_read_through_then_set() {
    let cache: AsyncCache<&'static str, Vec<u32>> =
        AsyncCache::new(CacheConfig::ttl(Duration::from_secs(365 * 24 * 3600)));

    let populated =
        cache.get_or_try_insert_with("matches", || async { Ok::<_, String>(vec![3, 2, 1]) }).await;
    assert_eq!(populated, Ok(vec![3, 2, 1]));

    cache.insert("matches", vec![4, 3, 2, 1]).await;

    let read = cache
        .get_or_try_insert_with("matches", || async { Ok::<_, String>(Vec::new()) })
        .await;
    assert_eq!(read, Ok(vec![4, 3, 2, 1]));
    assert_eq!(cache.stats().populations, 1);
}

/// Verifies single-flight behaviour when many tasks miss at once.
///
/// # Test Steps
/// 1. Spawn 32 readers against an empty cache on a multi-thread runtime
/// 2. Each reader's populate function increments a shared counter and sleeps
/// 3. Verify the counter is 1 and every reader saw the same value
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_read_through_single_flight() {
    let cache = Arc::new(AsyncCache::<String, u64>::new(CacheConfig::default()));
    let populate_calls = Arc::new(AtomicUsize::new(0));

    let readers = (0..32).map(|_| {
        let cache = Arc::clone(&cache);
        let populate_calls = Arc::clone(&populate_calls);
        tokio::spawn(async move {
            cache
                .get_or_try_insert_with("feed".to_string(), || async move {
                    populate_calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(25)).await;
                    Ok::<_, String>(100)
                })
                .await
        })
    });

    for result in join_all(readers).await {
        assert_eq!(result.unwrap(), Ok(100));
    }
    assert_eq!(populate_calls.load(Ordering::SeqCst), 1);
}

/// A failed population must leave the slot empty so the next caller retries.
#[tokio::test]
async fn test_population_failure_does_not_poison() {
    let cache: AsyncCache<String, u64> = AsyncCache::new(CacheConfig::default());

    let first =
        cache.get_or_try_insert_with("feed".to_string(), || async { Err::<u64, _>("down") }).await;
    assert_eq!(first, Err("down"));
    assert!(!cache.contains_key(&"feed".to_string()).await);

    let second = cache.get_or_try_insert_with("feed".to_string(), || async { Ok(1) }).await;
    assert_eq!(second, Ok::<_, &str>(1));
}

/// Expiry turns the next read into a miss that repopulates.
#[tokio::test]
async fn test_expiry_triggers_repopulation() {
    let clock = MockClock::new();
    let cache = AsyncCache::with_clock(CacheConfig::ttl(Duration::from_secs(60)), clock.clone());

    let first = cache.get_or_try_insert_with("feed", || async { Ok::<_, ()>("old") }).await;
    clock.advance(Duration::from_secs(30));
    let still_cached = cache.get_or_try_insert_with("feed", || async { Ok::<_, ()>("new") }).await;
    clock.advance(Duration::from_secs(31));
    let refreshed = cache.get_or_try_insert_with("feed", || async { Ok::<_, ()>("new") }).await;

    assert_eq!(first, Ok("old"));
    assert_eq!(still_cached, Ok("old"));
    assert_eq!(refreshed, Ok("new"));
    assert_eq!(cache.stats().expirations, 1);
}
