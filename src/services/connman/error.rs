/// ConnMan service errors
#[derive(thiserror::Error, Debug)]
pub enum ConnmanError {
    /// D-Bus communication error
    #[error("D-Bus operation failed: {0}")]
    DbusError(#[from] zbus::Error),

    /// Service initialization failed
    #[error("Failed to initialize ConnMan service: {0}")]
    InitializationFailed(String),

    /// The service task is gone, so actions can no longer be delivered
    #[error("ConnMan service is not running")]
    ServiceStopped,
}
