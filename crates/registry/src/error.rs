//! Registry error types.

use shiptrack_backend::BackendError;

/// Errors produced by claim operations.
///
/// `Unavailable` means the claim outcome is unknown: the caller must not
/// append the code locally until a definitive answer arrives.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BackendError> for RegistryError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(msg) => RegistryError::Unavailable(msg),
            BackendError::Serialization(e) => RegistryError::Serialization(e),
        }
    }
}
