//! Shared test helpers for `matchfeed-core` integration tests.

#![allow(dead_code)]

pub mod store;
