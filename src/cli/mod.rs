//! Command-line interface.
//!
//! `monitor` runs both services until interrupted, `status` prints a one-shot
//! snapshot, and `config` inspects the configuration file.

mod commands;
pub mod formatting;
mod types;

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};

use crate::config::Config;
pub use commands::status::{ConnmanReport, StatusReport, TelephonyReport};
pub use types::{CliError, CommandResult};

/// Top-level arguments.
#[derive(Debug, Parser)]
#[command(name = "connpanel")]
#[command(about = "Follow ConnMan technologies and oFono modems on the system bus")]
pub struct Cli {
    /// Configuration file to use instead of the default location.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Follow both services and log every change until Ctrl-C.
    Monitor,
    /// Print the state of modems and technologies once.
    Status {
        /// Milliseconds to wait for the initial enumeration to settle.
        #[arg(long, default_value_t = 1500)]
        settle_ms: u64,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Inspect the configuration.
    Config {
        /// Config action.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// `config` subcommands.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,
    /// Print the JSON schema of the configuration file.
    Schema,
}

impl Cli {
    /// Whether the command keeps running and wants full logging.
    pub fn is_long_running(&self) -> bool {
        matches!(self.command, Commands::Monitor)
    }

    /// Loads the configuration named by `--config`, or the default one.
    ///
    /// # Errors
    /// Returns `CliError::ConfigError` if the file cannot be read or is invalid.
    pub fn load_config(&self) -> Result<Config, CliError> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        Ok(config)
    }

    /// Runs the selected command.
    ///
    /// # Errors
    /// Returns `CliError` if a service cannot start or output cannot be
    /// produced.
    pub async fn execute(&self, config: &Config) -> CommandResult {
        match &self.command {
            Commands::Monitor => commands::monitor::execute(config).await,
            Commands::Status { settle_ms, json } => {
                commands::status::execute(config, Duration::from_millis(*settle_ms), *json).await
            }
            Commands::Config { command } => commands::config::execute(config, *command),
        }
    }
}

#[cfg(test)]
mod tests;
