//! Configuration loading from files on disk.

#![allow(clippy::panic)]

use std::fs;

use connpanel::{
    ConnpanelError,
    config::{Config, LogLevel},
};
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();

    let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn file_overrides_only_what_it_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[general]
log_level = "trace"
log_to_file = true

[telephony]
pin_timeout_secs = 45

[connman]
enabled = false
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Trace);
    assert!(config.general.log_to_file);
    assert_eq!(config.telephony.pin_timeout_secs, 45);
    assert_eq!(config.telephony.service, "org.ofono");
    assert!(!config.connman.enabled);
    assert_eq!(config.connman.service, "net.connman");
}

#[test]
fn invalid_toml_reports_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[telephony\nenabled = true").unwrap();

    match Config::load_from(&path).unwrap_err() {
        ConnpanelError::TomlParseError { location, .. } => {
            assert!(location.ends_with("config.toml"), "location: {location}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wrong_type_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[telephony]\npin_timeout_secs = \"soon\"").unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(ConnpanelError::TomlParseError { .. })
    ));
}

#[test]
fn empty_bus_name_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[telephony]\nservice = \"  \"").unwrap();

    match Config::load_from(&path).unwrap_err() {
        ConnpanelError::ConfigValidation { component, .. } => {
            assert_eq!(component, "telephony.service");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn directory_instead_of_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        Config::load_from(dir.path()),
        Err(ConnpanelError::IoError { .. })
    ));
}

#[test]
fn shown_config_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let mut original = Config::default();
    original.telephony.wizard = "/opt/bin/apn-wizard".to_string();
    original.general.log_level = LogLevel::Warn;

    fs::write(&path, original.to_toml().unwrap()).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), original);
}
