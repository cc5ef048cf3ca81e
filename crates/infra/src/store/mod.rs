//! Match store adapters
//!
//! Implementations of the `MatchStore` port defined in `matchfeed-core`.

pub mod memory;

pub use memory::{InMemoryMatchStore, MatchRow, NetworkRow};
