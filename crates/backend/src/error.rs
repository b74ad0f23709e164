//! Backend error types.

/// Errors produced by a document backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}
