//! Scanner error types.

/// Errors produced by the scan session and its camera device.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The camera could not be acquired; the session stays idle.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// The torch could not be switched; scanning state is unaffected.
    #[error("torch error: {0}")]
    Torch(String),
}
