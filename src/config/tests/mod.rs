//! Unit tests for config module
//!
//! Tests configuration types, defaults, and serialization.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::panic)]

use crate::{
    ConnpanelError,
    config::{Config, LogLevel},
};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert!(!config.general.log_to_file);
    assert!(config.telephony.enabled);
    assert_eq!(config.telephony.service, "org.ofono");
    assert_eq!(config.telephony.wizard, "ofono-wizard");
    assert_eq!(config.telephony.pin_timeout_secs, 120);
    assert!(config.connman.enabled);
    assert_eq!(config.connman.service, "net.connman");
}

#[test]
fn config_serialize_toml() {
    let toml_str = Config::default().to_toml().unwrap();

    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[telephony]"));
    assert!(toml_str.contains("[connman]"));
}

#[test]
fn config_deserialize_partial_sections() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [telephony]
        wizard = "/usr/libexec/mobile-wizard"
    "#;

    let config = Config::parse(toml_str, None).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.telephony.wizard, "/usr/libexec/mobile-wizard");
    assert_eq!(config.telephony.service, "org.ofono");
    assert_eq!(config.telephony.pin_timeout_secs, 120);
    assert_eq!(config.connman.service, "net.connman");
}

#[test]
fn config_serialize_roundtrip() {
    let mut original = Config::default();
    original.telephony.pin_timeout_secs = 30;
    original.connman.enabled = false;

    let toml_str = original.to_toml().unwrap();
    let deserialized = Config::parse(&toml_str, None).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn config_empty_toml() {
    let config = Config::parse("", None).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn config_rejects_unknown_log_level() {
    let err = Config::parse("[general]\nlog_level = \"loud\"", None).unwrap_err();

    match err {
        ConnpanelError::TomlParseError { location, .. } => assert_eq!(location, "string"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn config_rejects_zero_pin_timeout() {
    let err = Config::parse("[telephony]\npin_timeout_secs = 0", None).unwrap_err();

    match err {
        ConnpanelError::ConfigValidation { component, .. } => {
            assert_eq!(component, "telephony.pin_timeout_secs");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn disabled_service_skips_its_validation() {
    let config = Config::parse(
        "[connman]\nenabled = false\nservice = \"\"",
        None,
    )
    .unwrap();

    assert!(!config.connman.enabled);
}

#[test]
fn log_level_directives() {
    assert_eq!(LogLevel::Warn.directive(), "warn");
    assert_eq!(LogLevel::Trace.to_string(), "trace");
}
