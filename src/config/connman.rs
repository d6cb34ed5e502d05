use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ConnMan technology tracking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConnmanConfig {
    /// Whether to follow ConnMan at all.
    pub enabled: bool,

    /// Bus name ConnMan owns on the system bus.
    pub service: String,
}

impl Default for ConnmanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service: String::from("net.connman"),
        }
    }
}
