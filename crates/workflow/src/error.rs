//! Workflow error types.

use shiptrack_protocol::shipment::ValidationError;
use shiptrack_registry::RegistryError;
use shiptrack_store::StoreError;

/// Errors produced by workflow operations.
///
/// All are per-operation and recoverable by retrying the user action; none
/// are fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("unknown shipment: {0}")]
    UnknownShipment(String),
}
