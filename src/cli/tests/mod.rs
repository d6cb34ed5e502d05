//! Unit tests for CLI module
//!
//! Tests argument parsing and output formatting.
//! No bus access or actual command execution.

#![allow(clippy::panic)]

use std::collections::BTreeMap;

use clap::Parser;

use crate::{
    cli::{
        Cli, Commands, ConfigCommand, ConnmanReport, StatusReport, TelephonyReport,
        formatting::{format_modem, format_switch, format_technology},
    },
    services::{
        connman::TechnologyView,
        telephony::{
            BearerKind, ConnectionView, ContextView, ModemStatus, ModemView, PinKind, SimView,
        },
    },
};

fn modem() -> ModemView {
    ModemView {
        path: String::from("/hfp_0"),
        name: String::from("Quectel EC25"),
        powered: true,
        online: true,
        status: ModemStatus::Lte,
        sim: Some(SimView {
            present: true,
            pin_required: PinKind::None,
            retries: BTreeMap::new(),
        }),
        connection: Some(ConnectionView {
            attached: true,
            bearer: BearerKind::Lte,
            roaming_allowed: false,
            context: Some(ContextView {
                path: String::from("/hfp_0/context1"),
                name: String::from("Internet"),
                apn: String::from("internet.example"),
                active: true,
                configured: true,
            }),
        }),
    }
}

#[test]
fn parses_status_flags() {
    let cli = Cli::try_parse_from(["connpanel", "status", "--settle-ms", "250", "--json"]).unwrap();

    match cli.command {
        Commands::Status { settle_ms, json } => {
            assert_eq!(settle_ms, 250);
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert!(!cli.is_long_running());
}

#[test]
fn parses_global_config_path() {
    let cli =
        Cli::try_parse_from(["connpanel", "config", "show", "--config", "/tmp/alt.toml"]).unwrap();

    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/alt.toml")));
    assert!(matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommand::Show
        }
    ));
}

#[test]
fn monitor_is_long_running() {
    let cli = Cli::try_parse_from(["connpanel", "monitor"]).unwrap();
    assert!(cli.is_long_running());
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["connpanel", "restart"]).is_err());
}

#[test]
fn modem_block_lists_subsystems() {
    let text = format_modem(&modem());

    assert!(text.contains("Quectel EC25"));
    assert!(text.contains("/hfp_0"));
    assert!(text.contains("sim      ready"));
    assert!(text.contains("bearer LTE"));
    assert!(text.contains("Internet (internet.example)  active"));
}

#[test]
fn modem_block_shows_pin_retries() {
    let mut view = modem();
    view.status = ModemStatus::PinRequired;
    view.sim = Some(SimView {
        present: true,
        pin_required: PinKind::Pin,
        retries: BTreeMap::from([(PinKind::Pin, 2)]),
    });
    view.connection = None;

    let text = format_modem(&view);

    assert!(text.contains("PIN required (2 attempts left)"));
    assert!(!text.contains("context"));
}

#[test]
fn unconfigured_context_is_flagged() {
    let mut view = modem();
    if let Some(connection) = view.connection.as_mut() {
        connection.context = Some(ContextView {
            path: String::from("/hfp_0/context1"),
            name: String::from("Internet"),
            apn: String::new(),
            active: false,
            configured: false,
        });
    }

    assert!(format_modem(&view).contains("Internet (not configured)"));
}

#[test]
fn technology_line() {
    let wifi = TechnologyView {
        path: String::from("/net/connman/technology/wifi"),
        name: String::from("WiFi"),
        kind: String::from("wifi"),
        powered: true,
    };

    assert_eq!(format_technology(&wifi), "  WiFi (wifi)  on");
    assert_eq!(format_switch(false), "off");
}

#[test]
fn report_mentions_absent_services() {
    let report = StatusReport {
        telephony: Some(TelephonyReport {
            running: false,
            status: ModemStatus::Disabled,
            modems: Vec::new(),
        }),
        connman: Some(ConnmanReport {
            running: false,
            offline_mode: None,
            technologies: Vec::new(),
        }),
    };

    let text = report.render();

    assert!(text.contains("oFono not running"));
    assert!(text.contains("  not running"));
}

#[test]
fn report_skips_disabled_services() {
    let report = StatusReport {
        telephony: Some(TelephonyReport {
            running: true,
            status: ModemStatus::Lte,
            modems: vec![modem()],
        }),
        connman: None,
    };

    let text = report.render();

    assert!(!text.contains("ConnMan"));
    assert!(text.contains("Quectel EC25"));
}

#[test]
fn report_serializes_statuses_in_kebab_case() {
    let report = StatusReport {
        telephony: Some(TelephonyReport {
            running: true,
            status: ModemStatus::PukRequired,
            modems: Vec::new(),
        }),
        connman: None,
    };

    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["telephony"]["status"], "puk-required");
    assert!(json["connman"].is_null());
}
