//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use matchfeed_domain::MatchFeedError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;
use tracing_subscriber::util::TryInitError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MatchFeedError);

impl From<InfraError> for MatchFeedError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MatchFeedError> for InfraError {
    fn from(value: MatchFeedError) -> Self {
        InfraError(value)
    }
}

trait IntoMatchFeedError {
    fn into_matchfeed(self) -> MatchFeedError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → MatchFeedError */
/* -------------------------------------------------------------------------- */

impl IntoMatchFeedError for IoError {
    fn into_matchfeed(self) -> MatchFeedError {
        match self.kind() {
            ErrorKind::NotFound => MatchFeedError::Config(format!("config file not found: {self}")),
            ErrorKind::PermissionDenied => {
                MatchFeedError::Config(format!("config file not readable: {self}"))
            }
            _ => MatchFeedError::Config(format!("failed to read config file: {self}")),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_matchfeed())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → MatchFeedError */
/* -------------------------------------------------------------------------- */

impl IntoMatchFeedError for JsonError {
    fn into_matchfeed(self) -> MatchFeedError {
        MatchFeedError::Config(format!(
            "invalid JSON format at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_matchfeed())
    }
}

impl IntoMatchFeedError for TomlError {
    fn into_matchfeed(self) -> MatchFeedError {
        MatchFeedError::Config(format!("invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_matchfeed())
    }
}

/* -------------------------------------------------------------------------- */
/* tracing_subscriber init → MatchFeedError */
/* -------------------------------------------------------------------------- */

impl IntoMatchFeedError for TryInitError {
    fn into_matchfeed(self) -> MatchFeedError {
        MatchFeedError::Internal(format!("failed to install tracing subscriber: {self}"))
    }
}

impl From<TryInitError> for InfraError {
    fn from(value: TryInitError) -> Self {
        InfraError(value.into_matchfeed())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
