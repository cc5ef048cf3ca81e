//! Configuration loader
//!
//! Builds the application [`Config`] from an optional file plus environment
//! overrides.
//!
//! ## Loading Strategy
//! 1. Start from a config file when one is found, otherwise from defaults
//! 2. Apply `MATCHFEED_*` environment overrides on top
//! 3. Validate the result
//!
//! ## Environment Variables
//! - `MATCHFEED_CACHE_BATCH_SIZE`: Matches loaded into the cached feed
//! - `MATCHFEED_CACHE_TTL_SECONDS`: Lifetime of the cached feed in seconds
//! - `MATCHFEED_SPRT_ELO0`: Elo difference under H0
//! - `MATCHFEED_SPRT_ELO1`: Elo difference under H1
//! - `MATCHFEED_SPRT_ALPHA`: False acceptance rate
//! - `MATCHFEED_SPRT_BETA`: False rejection rate
//! - `MATCHFEED_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `MATCHFEED_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./matchfeed.json` or `./matchfeed.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use matchfeed_domain::{Config, MatchFeedError, Result};

use crate::errors::InfraError;

/// Load configuration with automatic fallback strategy
///
/// Uses the first probed config file, or defaults when none exists, then
/// applies environment overrides.
///
/// # Errors
/// Returns `MatchFeedError::Config` if:
/// - A config file exists but cannot be read or parsed
/// - An override variable holds an unparsable value
/// - The resulting configuration fails validation
pub fn load() -> Result<Config> {
    let base = match probe_config_paths() {
        Some(path) => read_config_file(&path)?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            Config::default()
        }
    };

    let config = apply_env_overrides(base)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from defaults and environment variables only
///
/// # Environment Variables
/// See module documentation for the complete list. All are optional.
///
/// # Errors
/// Returns `MatchFeedError::Config` if a variable has an invalid value or
/// the result fails validation.
pub fn load_from_env() -> Result<Config> {
    let config = apply_env_overrides(Config::default())?;
    config.validate()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Environment overrides are not applied; see [`load`].
///
/// # Errors
/// Returns `MatchFeedError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MatchFeedError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MatchFeedError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    let config = read_config_file(&config_path)?;
    config.validate()?;
    Ok(config)
}

/// Overlay `MATCHFEED_*` environment variables onto `config`
///
/// # Errors
/// Returns `MatchFeedError::Config` naming the variable whose value does
/// not parse.
pub fn apply_env_overrides(config: Config) -> Result<Config> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "matchfeed.json",
        "matchfeed.toml",
        "config.json",
        "config.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter().flat_map(|dir| NAMES.iter().map(move |name| dir.join(name))).find(|p| p.exists())
}

fn read_config_file(path: &Path) -> Result<Config> {
    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path).map_err(InfraError::from)?;
    parse_config(&contents, path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`), defaulting to
/// JSON.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents).map_err(|e| InfraError::from(e).into()),
        _ => Err(MatchFeedError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn apply_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Result<Config> {
    if let Some(value) = parse_var(&var, "MATCHFEED_CACHE_BATCH_SIZE")? {
        config.cache.batch_size = value;
    }
    if let Some(value) = parse_var(&var, "MATCHFEED_CACHE_TTL_SECONDS")? {
        config.cache.ttl_seconds = value;
    }
    if let Some(value) = parse_var(&var, "MATCHFEED_SPRT_ELO0")? {
        config.sprt.elo0 = value;
    }
    if let Some(value) = parse_var(&var, "MATCHFEED_SPRT_ELO1")? {
        config.sprt.elo1 = value;
    }
    if let Some(value) = parse_var(&var, "MATCHFEED_SPRT_ALPHA")? {
        config.sprt.alpha = value;
    }
    if let Some(value) = parse_var(&var, "MATCHFEED_SPRT_BETA")? {
        config.sprt.beta = value;
    }
    if let Some(level) = var("MATCHFEED_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("MATCHFEED_LOG_JSON") {
        config.logging.json = parse_bool(&json);
    }
    Ok(config)
}

/// Parse an optional variable, naming it in the error.
fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| MatchFeedError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Accepts: `1`, `true`, `yes`, `on` (case-insensitive); anything else is
/// `false`.
fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
