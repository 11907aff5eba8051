use super::data::{Config, ConfigKey};
use super::defaults::{DEFAULT_HISTORY_WINDOW, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS};
use super::io::ConfigError;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.model(), DEFAULT_MODEL);
    assert_eq!(config.history_window(), DEFAULT_HISTORY_WINDOW);
    assert_eq!(
        config.request_timeout(),
        Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    );
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    // Phase 1: Initial save and load, creating the parent directory
    let config = Config {
        model: Some("gemini-2.5-pro".to_string()),
        temperature: Some(0.3),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    // Phase 2: Unset one value, the other survives
    let mut config = loaded;
    config.unset_value(ConfigKey::Model);
    config
        .save_to_path(&config_path)
        .expect("Failed to save modified config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load modified config");
    assert_eq!(loaded.model, None);
    assert_eq!(loaded.model(), DEFAULT_MODEL);
    assert_eq!(loaded.temperature, Some(0.3));
}

#[test]
fn test_invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "model = [unterminated").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
fn test_set_value_validates_input() {
    let mut config = Config::default();

    config
        .set_value(ConfigKey::Temperature, "1.2")
        .expect("valid temperature");
    assert_eq!(config.temperature(), 1.2);
    assert!(config.set_value(ConfigKey::Temperature, "3").is_err());
    assert!(config.set_value(ConfigKey::Temperature, "warm").is_err());

    config
        .set_value(ConfigKey::RequestTimeout, "30")
        .expect("valid timeout");
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert!(config.set_value(ConfigKey::RequestTimeout, "0").is_err());

    config
        .set_value(ConfigKey::HistoryWindow, "4")
        .expect("valid window");
    assert_eq!(config.history_window(), 4);

    config
        .set_value(ConfigKey::DataDir, "/tmp/chairchat-data")
        .expect("valid dir");
    assert_eq!(
        config.data_dir().expect("data dir"),
        PathBuf::from("/tmp/chairchat-data")
    );

    assert!(config.set_value(ConfigKey::Model, "   ").is_err());
}

#[test]
fn test_blank_overrides_fall_back_to_defaults() {
    let config = Config {
        model: Some("  ".to_string()),
        api_base_url: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(config.model(), DEFAULT_MODEL);
    assert_eq!(
        config.api_base_url(),
        "https://generativelanguage.googleapis.com"
    );
}

#[test]
fn test_config_keys_round_trip() {
    for key in ConfigKey::ALL {
        assert_eq!(ConfigKey::from_name(key.name()), Some(key));
    }
    assert_eq!(ConfigKey::from_name("API-BASE-URL"), Some(ConfigKey::ApiBaseUrl));
    assert_eq!(ConfigKey::from_name("theme"), None);
}
