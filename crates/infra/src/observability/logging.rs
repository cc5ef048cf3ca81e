//! Tracing subscriber setup

use matchfeed_domain::{LoggingConfig, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::InfraError;

/// Install the global subscriber: an [`EnvFilter`] and a `fmt` layer that
/// writes JSON lines when `config.json` is set.
///
/// # Errors
/// Returns `MatchFeedError::Internal` when a global subscriber is already
/// installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.map_err(InfraError::from)?;

    tracing::info!(level = %config.level, json = config.json, "tracing initialised");
    Ok(())
}

/// Filter from `RUST_LOG`, falling back to the configured level and then to
/// `info` when that level does not parse.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use matchfeed_domain::MatchFeedError;

    use super::*;

    #[test]
    fn second_init_is_an_internal_error() {
        let config = LoggingConfig::default();
        // Only one global subscriber per process.
        let _ = init_tracing(&config);
        let err = init_tracing(&config).unwrap_err();
        assert!(matches!(err, MatchFeedError::Internal(_)));
    }

    #[test]
    fn filter_falls_back_to_configured_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { level: "matchfeed_core=debug,warn".into(), json: false };
        assert!(build_filter(&config).to_string().contains("matchfeed_core=debug"));
    }
}
