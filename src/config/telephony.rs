use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// oFono modem tracking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TelephonyConfig {
    /// Whether to follow oFono at all.
    pub enabled: bool,

    /// Bus name oFono owns on the system bus.
    pub service: String,

    /// Program launched with `-p <modem path>` to configure mobile data.
    pub wizard: String,

    /// Seconds an unanswered PIN prompt stays open before it is withdrawn.
    pub pin_timeout_secs: u64,
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service: String::from("org.ofono"),
            wizard: String::from("ofono-wizard"),
            pin_timeout_secs: 120,
        }
    }
}
