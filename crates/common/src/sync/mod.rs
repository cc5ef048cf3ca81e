//! Synchronization primitives for async code
//!
//! ## Submodules
//!
//! - **`lock`**: scoped, fair async mutual exclusion for critical sections
//!   that span `.await` points

pub mod lock;

pub use lock::{AsyncLock, LockGuard};
