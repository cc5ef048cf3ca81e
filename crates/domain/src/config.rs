//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_MATCH_BATCH_SIZE, DEFAULT_SPRT_ALPHA, DEFAULT_SPRT_BETA,
    DEFAULT_SPRT_ELO0, DEFAULT_SPRT_ELO1,
};
use crate::errors::{MatchFeedError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: MatchCacheConfig,
    pub sprt: SprtConfig,
    pub logging: LoggingConfig,
}

/// Match cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchCacheConfig {
    /// Records loaded from the store when the cache is populated
    pub batch_size: usize,
    /// Seconds before the cached list expires
    pub ttl_seconds: u64,
}

/// SPRT hypothesis and error-rate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprtConfig {
    /// Elo difference under the null hypothesis
    pub elo0: f64,
    /// Elo difference under the alternative hypothesis
    pub elo1: f64,
    /// False positive rate
    pub alpha: f64,
    /// False negative rate
    pub beta: f64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for MatchCacheConfig {
    fn default() -> Self {
        Self { batch_size: DEFAULT_MATCH_BATCH_SIZE, ttl_seconds: DEFAULT_CACHE_TTL_SECS }
    }
}

impl Default for SprtConfig {
    fn default() -> Self {
        Self {
            elo0: DEFAULT_SPRT_ELO0,
            elo1: DEFAULT_SPRT_ELO1,
            alpha: DEFAULT_SPRT_ALPHA,
            beta: DEFAULT_SPRT_BETA,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns `MatchFeedError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.cache.batch_size == 0 {
            return Err(MatchFeedError::Config("cache.batch_size must be at least 1".to_string()));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(MatchFeedError::Config("cache.ttl_seconds must be at least 1".to_string()));
        }
        self.sprt.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(MatchFeedError::Config("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}

impl SprtConfig {
    /// # Errors
    /// Returns `MatchFeedError::Config` when the error rates fall outside
    /// `(0, 1)` or the hypotheses do not satisfy `elo0 < elo1`.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [("sprt.alpha", self.alpha), ("sprt.beta", self.beta)] {
            if !(rate > 0.0 && rate < 1.0) {
                return Err(MatchFeedError::Config(format!(
                    "{name} must be between 0 and 1 (exclusive), got {rate}"
                )));
            }
        }
        if !(self.elo0 < self.elo1) {
            return Err(MatchFeedError::Config(format!(
                "sprt.elo0 ({}) must be lower than sprt.elo1 ({})",
                self.elo0, self.elo1
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.batch_size, 100);
        assert_eq!(config.cache.ttl_seconds, 31_536_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"cache": {"batch_size": 25}}"#).unwrap();
        assert_eq!(config.cache.batch_size, 25);
        assert_eq!(config.cache.ttl_seconds, DEFAULT_CACHE_TTL_SECS);
        assert_eq!(config.sprt, SprtConfig::default());
    }

    #[test]
    fn rejects_zero_batch_size() {
        let mut config = Config::default();
        config.cache.batch_size = 0;
        assert!(matches!(config.validate(), Err(MatchFeedError::Config(_))));
    }

    #[test]
    fn rejects_inverted_hypotheses() {
        let sprt = SprtConfig { elo0: 10.0, elo1: 5.0, ..SprtConfig::default() };
        assert!(sprt.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_error_rates() {
        let sprt = SprtConfig { alpha: 1.0, ..SprtConfig::default() };
        assert!(sprt.validate().is_err());

        let sprt = SprtConfig { beta: 0.0, ..SprtConfig::default() };
        assert!(sprt.validate().is_err());
    }
}
