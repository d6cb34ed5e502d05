//! Configuration schema definitions and loading.
//!
//! Everything lives in a single TOML file. Every section and field has a
//! default, so an empty or missing file yields a working configuration.

mod connman;
mod general;
mod loading;
mod paths;
mod telephony;

pub use connman::ConnmanConfig;
pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use telephony::TelephonyConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure for connpanel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// oFono modem tracking.
    #[serde(default)]
    pub telephony: TelephonyConfig,

    /// ConnMan technology tracking.
    #[serde(default)]
    pub connman: ConnmanConfig,
}

#[cfg(test)]
mod tests;
