//! Observability infrastructure
//!
//! Installs the process-wide `tracing` subscriber. Library code only emits
//! events through the `tracing` macros; binaries call [`init_tracing`] once
//! at startup.

pub mod logging;

pub use logging::{build_filter, init_tracing};
