use super::PinKind;

/// Telephony service errors
#[derive(thiserror::Error, Debug)]
pub enum TelephonyError {
    /// D-Bus communication error
    #[error("D-Bus operation failed: {0}")]
    DbusError(#[from] zbus::Error),

    /// Service initialization failed
    #[error("Failed to initialize telephony service: {0}")]
    InitializationFailed(String),

    /// A credential did not pass local validation and was never sent
    #[error("{kind} rejected: {reason}")]
    ValidationRejected {
        /// Credential kind the prompt was raised for.
        kind: PinKind,
        /// Which rule the input broke.
        reason: &'static str,
    },

    /// The service task is gone, so actions can no longer be delivered
    #[error("Telephony service is not running")]
    ServiceStopped,
}
