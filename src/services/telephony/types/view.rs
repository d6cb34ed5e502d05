use std::collections::BTreeMap;

use serde::Serialize;

use super::{BearerKind, ModemStatus, PinKind};
use crate::services::common::ObjectPath;

/// Everything a panel needs to draw one modem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModemView {
    /// Modem object path.
    pub path: ObjectPath,
    /// Menu label.
    pub name: String,
    /// Radio power.
    pub powered: bool,
    /// RF enabled.
    pub online: bool,
    /// Derived status.
    pub status: ModemStatus,
    /// SIM state, when the modem exposes a SIM manager.
    pub sim: Option<SimView>,
    /// Packet service state, when the modem exposes a connection manager.
    pub connection: Option<ConnectionView>,
}

/// SIM card state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimView {
    /// Card inserted.
    pub present: bool,
    /// Credential blocking the card.
    pub pin_required: PinKind,
    /// Attempts left per credential.
    pub retries: BTreeMap<PinKind, u8>,
}

/// Packet service state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionView {
    /// Attached to the packet network.
    pub attached: bool,
    /// Current bearer.
    pub bearer: BearerKind,
    /// Data roaming allowed.
    pub roaming_allowed: bool,
    /// Tracked internet context.
    pub context: Option<ContextView>,
}

/// The internet context of a modem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextView {
    /// Context object path.
    pub path: ObjectPath,
    /// Friendly name.
    pub name: String,
    /// Access point name.
    pub apn: String,
    /// Connected.
    pub active: bool,
    /// Whether an APN has been set.
    pub configured: bool,
}
