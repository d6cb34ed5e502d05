use thiserror::Error;

use crate::{
    ConnpanelError,
    services::{connman::ConnmanError, telephony::TelephonyError},
};

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// Loading or rendering the configuration failed.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConnpanelError),

    /// A service could not be started or stopped unexpectedly.
    ///
    /// Covers the system bus being unreachable as well as a service task
    /// that exited.
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<TelephonyError> for CliError {
    fn from(err: TelephonyError) -> Self {
        CliError::ServiceError(err.to_string())
    }
}

impl From<ConnmanError> for CliError {
    fn from(err: ConnmanError) -> Self {
        CliError::ServiceError(err.to_string())
    }
}

/// Type alias for command execution results.
///
/// Commands return the text to print on success.
pub type CommandResult = Result<String, CliError>;
