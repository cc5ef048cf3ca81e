//! # MatchFeed Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (JSON/TOML files, environment overrides)
//! - Tracing subscriber setup
//! - The in-memory `MatchStore` adapter
//!
//! ## Architecture
//! - Implements traits defined in `matchfeed-core`
//! - Contains all "impure" code (file I/O, environment, global subscriber)

pub mod config;
pub mod errors;
pub mod observability;
pub mod store;

// Re-export commonly used items
pub use errors::InfraError;
pub use observability::init_tracing;
pub use store::{InMemoryMatchStore, MatchRow, NetworkRow};
