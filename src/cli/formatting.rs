//! Formatting utilities for CLI output.

use crate::services::{
    connman::TechnologyView,
    telephony::{ConnectionView, ModemStatus, ModemView, PinKind, SimView},
};

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats secondary details with muted styling
pub fn format_description(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats a modem status, colored by how usable the modem is.
pub fn format_status(status: ModemStatus) -> String {
    let color = match status {
        ModemStatus::Disabled | ModemStatus::NoSim => Colors::RED,
        ModemStatus::PinRequired | ModemStatus::PukRequired | ModemStatus::SimReady => {
            Colors::YELLOW
        }
        _ => Colors::GREEN,
    };
    format!("{color}{status}{}", Colors::RESET)
}

/// Formats an on/off switch.
pub fn format_switch(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

/// Renders one modem as an indented block.
pub fn format_modem(modem: &ModemView) -> String {
    let mut lines = vec![
        format!("  {} [{}]", modem.name, format_status(modem.status)),
        format_description(&format!("    path     {}", modem.path)),
        format!(
            "    powered  {}  online {}",
            format_switch(modem.powered),
            format_switch(modem.online)
        ),
    ];

    if let Some(sim) = &modem.sim {
        lines.push(format!("    sim      {}", format_sim(sim)));
    }
    if let Some(connection) = &modem.connection {
        lines.extend(format_connection(connection));
    }

    lines.join("\n")
}

fn format_sim(sim: &SimView) -> String {
    if !sim.present {
        return String::from("absent");
    }
    if sim.pin_required == PinKind::None {
        return String::from("ready");
    }

    match sim.retries.get(&sim.pin_required) {
        Some(left) => format!("{} required ({left} attempts left)", sim.pin_required),
        None => format!("{} required", sim.pin_required),
    }
}

fn format_connection(connection: &ConnectionView) -> Vec<String> {
    let mut lines = vec![format!(
        "    data     {}  bearer {}  roaming {}",
        if connection.attached {
            "attached"
        } else {
            "detached"
        },
        connection.bearer,
        format_switch(connection.roaming_allowed)
    )];

    match &connection.context {
        Some(context) if context.configured => lines.push(format!(
            "    context  {} ({})  {}",
            context.name,
            context.apn,
            if context.active { "active" } else { "inactive" }
        )),
        Some(context) => lines.push(format!("    context  {} (not configured)", context.name)),
        None => lines.push(String::from("    context  none")),
    }

    lines
}

/// Renders one technology switch as a single line.
pub fn format_technology(technology: &TechnologyView) -> String {
    let kind = if technology.kind.is_empty() {
        String::new()
    } else {
        format!(" ({})", technology.kind)
    };
    format!(
        "  {}{kind}  {}",
        technology.name,
        format_switch(technology.powered)
    )
}
