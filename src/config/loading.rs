use std::{fs, io::ErrorKind, path::Path};

use tracing::{debug, info, instrument};

use super::{Config, ConfigPaths};
use crate::{ConnpanelError, Result};

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// # Errors
    /// Returns an error if the configuration directory cannot be located or
    /// the file exists but cannot be read, parsed or validated.
    pub fn load() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        Self::load_from(&path)
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing file is not an error: every setting takes its default.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds values that fail [`Config::validate`].
    #[instrument(fields(path = %path.display()))]
    pub fn load_from(path: &Path) -> Result<Config> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No configuration file, using defaults");
                return Ok(Config::default());
            }
            Err(err) => {
                return Err(ConnpanelError::IoError {
                    path: path.to_path_buf(),
                    details: err.to_string(),
                });
            }
        };

        let config = Self::parse(&content, Some(path))?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str, path: Option<&Path>) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConnpanelError::toml_parse(e, path))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the services cannot run with.
    ///
    /// # Errors
    /// Returns `ConnpanelError::ConfigValidation` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.telephony.enabled {
            if self.telephony.service.trim().is_empty() {
                return Err(ConnpanelError::validation(
                    "telephony.service",
                    "bus name must not be empty",
                ));
            }
            if self.telephony.wizard.trim().is_empty() {
                return Err(ConnpanelError::validation(
                    "telephony.wizard",
                    "wizard program must not be empty",
                ));
            }
            if self.telephony.pin_timeout_secs == 0 {
                return Err(ConnpanelError::validation(
                    "telephony.pin_timeout_secs",
                    "timeout must be at least one second",
                ));
            }
        }

        if self.connman.enabled && self.connman.service.trim().is_empty() {
            return Err(ConnpanelError::validation(
                "connman.service",
                "bus name must not be empty",
            ));
        }

        Ok(())
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConnpanelError::validation("config serialization", e.to_string()))
    }
}
