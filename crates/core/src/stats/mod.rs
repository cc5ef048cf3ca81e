//! Match statistics: SPRT verdict/progress and win rate

pub mod engine;
pub mod sprt;

pub use engine::{win_rate, StatsEngine};
pub use sprt::{compute_sprt, progress_estimate, SprtParams};
