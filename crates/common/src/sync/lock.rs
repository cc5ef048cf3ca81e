//! Scoped async lock.
//!
//! [`AsyncLock::acquire`] suspends the calling task (never the executor
//! thread) until the lock is free and returns a [`LockGuard`]. Dropping the
//! guard releases the lock, so every exit path of a critical section releases
//! it: normal return, `?` propagation, and unwinding alike.
//!
//! Waiters are queued FIFO by the underlying `tokio::sync::Mutex`, so no task
//! starves under sustained contention. Acquisition has no timeout.

use std::fmt;
use std::time::Instant;

use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

/// Named async mutual-exclusion primitive guarding a critical section.
///
/// The lock protects no data itself; it serializes the code paths that
/// populate or mutate some other shared resource.
///
/// # Examples
///
/// ```
/// use matchfeed_common::sync::AsyncLock;
///
/// # #[tokio::main]
/// # async fn main() {
/// let lock = AsyncLock::new("feed");
/// {
///     let _guard = lock.acquire().await;
///     assert!(lock.is_locked());
/// }
/// assert!(!lock.is_locked());
/// # }
/// ```
pub struct AsyncLock {
    name: &'static str,
    inner: Mutex<()>,
}

/// Proof of holding an [`AsyncLock`]; releases it on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
    name: &'static str,
    acquired_at: Instant,
    _guard: MutexGuard<'a, ()>,
}

impl AsyncLock {
    /// Create an unlocked lock. `name` only appears in trace output.
    pub fn new(name: &'static str) -> Self {
        Self { name, inner: Mutex::new(()) }
    }

    /// Wait until the lock is free and take it.
    pub async fn acquire(&self) -> LockGuard<'_> {
        let started = Instant::now();
        let guard = self.inner.lock().await;
        let acquired_at = Instant::now();

        trace!(
            lock = self.name,
            waited_us = acquired_at.duration_since(started).as_micros() as u64,
            "lock acquired"
        );

        LockGuard { name: self.name, acquired_at, _guard: guard }
    }

    /// Take the lock only if nobody holds it right now.
    pub fn try_acquire(&self) -> Option<LockGuard<'_>> {
        self.inner.try_lock().ok().map(|guard| LockGuard {
            name: self.name,
            acquired_at: Instant::now(),
            _guard: guard,
        })
    }

    /// Whether some task currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.inner.try_lock().is_err()
    }

    /// The name given at construction.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for AsyncLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLock")
            .field("name", &self.name)
            .field("locked", &self.is_locked())
            .finish()
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        trace!(
            lock = self.name,
            held_us = self.acquired_at.elapsed().as_micros() as u64,
            "lock released"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn guard_releases_on_drop() {
        let lock = AsyncLock::new("test");

        let guard = lock.acquire().await;
        assert!(lock.is_locked());
        assert!(lock.try_acquire().is_none());

        drop(guard);
        assert!(!lock.is_locked());
        assert!(lock.try_acquire().is_some());
    }

    #[tokio::test]
    async fn guard_releases_on_error_path() {
        fn step() -> Result<(), &'static str> {
            Err("boom")
        }

        async fn fails(lock: &AsyncLock) -> Result<(), &'static str> {
            let _guard = lock.acquire().await;
            step()?;
            Ok(())
        }

        let lock = AsyncLock::new("test");
        assert_eq!(fails(&lock).await, Err("boom"));
        assert!(!lock.is_locked());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn critical_sections_never_overlap() {
        let lock = Arc::new(AsyncLock::new("test"));
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];

        for _ in 0..8 {
            let lock = Arc::clone(&lock);
            let inside = Arc::clone(&inside);
            let max_inside = Arc::clone(&max_inside);
            handles.push(tokio::spawn(async move {
                let _guard = lock.acquire().await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }
}
