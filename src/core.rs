use std::{
    fmt, io,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

/// Errors raised while loading configuration and setting up the process.
///
/// Service failures have their own types
/// ([`TelephonyError`](crate::services::telephony::TelephonyError),
/// [`ConnmanError`](crate::services::connman::ConnmanError)).
#[derive(Error, Debug)]
pub enum ConnpanelError {
    /// A configuration value is out of range.
    #[error("configuration validation failed for '{component}': {details}")]
    ConfigValidation {
        /// Section or field that failed validation
        component: String,
        /// What is wrong with it
        details: String,
    },

    /// I/O on a specific path failed.
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path the operation touched
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O error without path context.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid TOML for [`Config`](crate::config::Config).
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// File path, or "string" for in-memory input
        location: String,
        /// Parse error details
        details: String,
    },
}

/// A `Result` defaulting to [`ConnpanelError`].
pub type Result<T> = result::Result<T, ConnpanelError>;

impl ConnpanelError {
    /// Creates a TOML parsing error with optional file path context.
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        ConnpanelError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates a validation error for one configuration component.
    pub fn validation(component: impl Into<String>, details: impl Into<String>) -> Self {
        ConnpanelError::ConfigValidation {
            component: component.into(),
            details: details.into(),
        }
    }
}
