//! Clock abstraction for testability
//!
//! Cache expiry and time-window queries read time through [`Clock`], so
//! production code uses [`SystemClock`] while tests drive a [`MockClock`].

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Trait for time operations to enable deterministic testing
pub trait Clock: Send + Sync + 'static {
    /// Get current instant (monotonic time)
    fn now(&self) -> Instant;

    /// Get current system time (wall clock)
    fn system_time(&self) -> SystemTime;

    /// Get milliseconds since UNIX epoch
    fn millis_since_epoch(&self) -> u64 {
        self.system_time().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
    }
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Implement Clock for Arc<T> where T: Clock for convenient cloning
impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn system_time(&self) -> SystemTime {
        (**self).system_time()
    }
}

/// Mock clock for deterministic testing
///
/// Clones share the same elapsed time, so a test can keep one handle and
/// hand another to the component under test.
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    wall_start: SystemTime,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a new mock clock starting at the current instant
    ///
    /// The wall clock starts at the UNIX epoch.
    pub fn new() -> Self {
        Self::with_wall_time(UNIX_EPOCH)
    }

    /// Create a mock clock whose wall clock starts at `wall_start`
    pub fn with_wall_time(wall_start: SystemTime) -> Self {
        Self { start: Instant::now(), wall_start, elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    /// Advance the mock clock by a duration
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock() += duration;
    }

    /// Set the mock clock to a specific elapsed time
    pub fn set_elapsed(&self, duration: Duration) {
        *self.elapsed.lock() = duration;
    }

    /// Get the current elapsed time
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed()
    }

    fn system_time(&self) -> SystemTime {
        self.wall_start + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_clock_advances_both_clocks() {
        let clock = MockClock::new();
        let start = clock.now();

        clock.advance(Duration::from_secs(30));

        assert_eq!(clock.now().duration_since(start), Duration::from_secs(30));
        assert_eq!(clock.millis_since_epoch(), 30_000);
    }

    #[test]
    fn clones_share_elapsed_time() {
        let clock = MockClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.elapsed(), Duration::from_millis(250));

        clock.set_elapsed(Duration::ZERO);
        assert_eq!(handle.elapsed(), Duration::ZERO);
    }

    #[test]
    fn with_wall_time_offsets_system_time() {
        let wall = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let clock = MockClock::with_wall_time(wall);
        clock.advance(Duration::from_secs(1));

        assert_eq!(clock.system_time(), wall + Duration::from_secs(1));
    }
}
