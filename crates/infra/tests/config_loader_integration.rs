//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use matchfeed_domain::MatchFeedError;
use matchfeed_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> (NamedTempFile, std::path::PathBuf) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    (temp_file, path)
}

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "cache": {
            "batch_size": 64,
            "ttl_seconds": 86400
        },
        "sprt": {
            "elo0": 0.0,
            "elo1": 20.0,
            "alpha": 0.05,
            "beta": 0.1
        },
        "logging": {
            "level": "matchfeed_core=debug,info",
            "json": true
        }
    }"#;
    let (_temp, path) = write_config(json_content, "json");

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.cache.batch_size, 64);
    assert_eq!(config.cache.ttl_seconds, 86_400);
    assert_eq!(config.sprt.elo1, 20.0);
    assert_eq!(config.sprt.beta, 0.1);
    assert_eq!(config.logging.level, "matchfeed_core=debug,info");
    assert!(config.logging.json);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[cache]
batch_size = 32

[sprt]
elo1 = 10.0
"#;
    let (_temp, path) = write_config(toml_content, "toml");

    let config = config::load_from_file(Some(path.clone())).expect("config should load");

    assert_eq!(config.cache.batch_size, 32);
    assert_eq!(config.sprt.elo1, 10.0);
    assert_eq!(config.sprt.alpha, 0.05);
    assert_eq!(config.logging.level, "info");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_rejects_inverted_hypotheses() {
    let (_temp, path) = write_config(r#"{ "sprt": { "elo0": 10.0, "elo1": 5.0 } }"#, "json");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(matches!(err, MatchFeedError::Config(ref msg) if msg.contains("elo0")));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_rejects_wrong_types() {
    let (_temp, path) = write_config("[cache]\nbatch_size = \"many\"\n", "toml");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(matches!(err, MatchFeedError::Config(_)));

    std::fs::remove_file(path).ok();
}
