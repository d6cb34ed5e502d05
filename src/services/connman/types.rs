use serde::Serialize;

use crate::services::common::{ObjectPath, decode};

/// Object path of the ConnMan root manager.
pub const MANAGER_PATH: &str = "/";

/// `net.connman.Manager`
pub const MANAGER_INTERFACE: &str = "net.connman.Manager";

/// `net.connman.Technology`
pub const TECHNOLOGY_INTERFACE: &str = "net.connman.Technology";

crate::property_record! {
    /// Properties of `net.connman.Manager` the panel shows.
    pub struct ManagerProperties {
        /// Global flight mode.
        offline_mode: bool = "OfflineMode" => decode::boolean,
    }
}

crate::property_record! {
    /// Properties of `net.connman.Technology`.
    pub struct TechnologyProperties {
        /// Friendly name, e.g. `WiFi`.
        name: String = "Name" => decode::string,
        /// `wifi`, `ethernet`, `cellular`, `bluetooth`, ...
        kind: String = "Type" => decode::string,
        /// Radio or link enabled.
        powered: bool = "Powered" => decode::boolean,
    }
}

/// Everything a panel needs to draw one technology switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyView {
    /// Technology object path.
    pub path: ObjectPath,
    /// Switch label.
    pub name: String,
    /// Technology type.
    pub kind: String,
    /// Switch state.
    pub powered: bool,
}

impl TechnologyView {
    pub(crate) fn new(path: &str, properties: &TechnologyProperties) -> Self {
        Self {
            path: path.to_string(),
            name: properties
                .name
                .clone()
                .unwrap_or_else(|| path.rsplit('/').next().unwrap_or(path).to_string()),
            kind: properties.kind.clone().unwrap_or_default(),
            powered: properties.powered.unwrap_or(false),
        }
    }
}
