//! Store error types.

use shiptrack_backend::BackendError;

/// Errors produced by shipment persistence.
///
/// There is no automatic retry: the caller surfaces the failure to the user
/// and the operation can be repeated as a whole.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(msg) => StoreError::Persistence(msg),
            BackendError::Serialization(e) => StoreError::Serialization(e),
        }
    }
}
