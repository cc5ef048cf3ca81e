//! Time abstractions
//!
//! - **[`clock`]**: real and mock clocks, so TTL and window logic can be
//!   tested without actual time passage
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use matchfeed_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
//! ```

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
