use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tracing::debug;

use super::Services;
use crate::{
    cli::{
        CommandResult,
        formatting::{format_header, format_modem, format_status, format_switch, format_technology},
    },
    config::Config,
    services::{
        Presenter, TracingPresenter,
        connman::TechnologyView,
        telephony::{ModemStatus, ModemView},
    },
};

pub(crate) async fn execute(config: &Config, settle: Duration, json: bool) -> CommandResult {
    let presenter: Arc<dyn Presenter> = Arc::new(TracingPresenter);
    let services = Services::start(config, presenter).await?;

    debug!(?settle, "Waiting for initial enumeration");
    tokio::time::sleep(settle).await;

    let report = StatusReport::collect(&services);
    services.stop();

    if json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(report.render())
    }
}

/// Snapshot printed by `connpanel status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    /// oFono state, absent when telephony is disabled.
    pub telephony: Option<TelephonyReport>,
    /// ConnMan state, absent when ConnMan is disabled.
    pub connman: Option<ConnmanReport>,
}

/// oFono part of a [`StatusReport`].
#[derive(Debug, Clone, Serialize)]
pub struct TelephonyReport {
    /// Whether oFono was reachable and enumerated.
    pub running: bool,
    /// Fleet indicator.
    pub status: ModemStatus,
    /// Every tracked modem.
    pub modems: Vec<ModemView>,
}

/// ConnMan part of a [`StatusReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ConnmanReport {
    /// Whether ConnMan was reachable and enumerated.
    pub running: bool,
    /// Flight mode, unknown while ConnMan is absent.
    pub offline_mode: Option<bool>,
    /// Every technology switch.
    pub technologies: Vec<TechnologyView>,
}

impl StatusReport {
    fn collect(services: &Services) -> Self {
        Self {
            telephony: services.telephony.as_ref().map(|telephony| TelephonyReport {
                running: telephony.is_bound(),
                status: telephony.status(),
                modems: telephony.modems(),
            }),
            connman: services.connman.as_ref().map(|connman| ConnmanReport {
                running: connman.is_running(),
                offline_mode: connman.offline_mode(),
                technologies: connman.technologies(),
            }),
        }
    }

    /// Renders the report as terminal text.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();

        if let Some(connman) = &self.connman {
            let mut lines = vec![format_header("ConnMan")];
            if !connman.running {
                lines.push(String::from("  not running"));
            } else {
                if let Some(offline) = connman.offline_mode {
                    lines.push(format!("  offline mode  {}", format_switch(offline)));
                }
                lines.extend(connman.technologies.iter().map(format_technology));
            }
            sections.push(lines.join("\n"));
        }

        if let Some(telephony) = &self.telephony {
            let mut lines = vec![format!(
                "{} [{}]",
                format_header("Modems"),
                format_status(telephony.status)
            )];
            if !telephony.running {
                lines.push(String::from("  oFono not running"));
            } else if telephony.modems.is_empty() {
                lines.push(String::from("  no modems"));
            } else {
                lines.extend(telephony.modems.iter().map(format_modem));
            }
            sections.push(lines.join("\n"));
        }

        sections.join("\n\n")
    }
}
