use std::fmt;

/// A remote method call that returned an error, or never got a reply.
///
/// Faults travel back to the registries inside completion events; they are
/// data, not control flow. Most are logged and superseded by the next signal.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{method} failed: {message}")]
pub struct RemoteFault {
    /// Remote method that failed.
    pub method: &'static str,
    /// Error text reported by the bus or the service.
    pub message: String,
}

impl RemoteFault {
    /// Wraps any displayable error from a call to `method`.
    pub fn new(method: &'static str, error: impl fmt::Display) -> Self {
        Self {
            method,
            message: error.to_string(),
        }
    }
}
