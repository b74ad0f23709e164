//! Claim tracking against the shared code collection.

use std::sync::Arc;

use shiptrack_backend::{CreateOutcome, DocumentBackend};
use shiptrack_protocol::claim::{ClaimResult, ClaimedCode};
use shiptrack_protocol::constants::CODES_COLLECTION;
use tracing::{debug, info, warn};

use crate::error::RegistryError;

/// Tracks which scan codes have been claimed, and by which shipment.
pub struct CodeRegistry {
    backend: Arc<dyn DocumentBackend>,
    collection: String,
}

impl CodeRegistry {
    /// Creates a registry over the default code collection.
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self::with_collection(backend, CODES_COLLECTION)
    }

    /// Creates a registry over a custom collection name.
    pub fn with_collection(backend: Arc<dyn DocumentBackend>, collection: impl Into<String>) -> Self {
        Self {
            backend,
            collection: collection.into(),
        }
    }

    /// Attempts to claim `code` for `shipment_id`.
    ///
    /// Behaves as a single logical unit per code: when two shipments race
    /// for the same code, exactly one observes [`ClaimResult::Claimed`].
    /// The losing side gets the current owner back and nothing is mutated.
    pub async fn try_claim(
        &self,
        code: &str,
        shipment_id: &str,
    ) -> Result<ClaimResult, RegistryError> {
        let claim = ClaimedCode::new(code, shipment_id);
        let doc = serde_json::to_value(&claim)?;

        match self
            .backend
            .create_if_absent(&self.collection, code, doc)
            .await?
        {
            CreateOutcome::Created => {
                info!(code, shipment = shipment_id, "code claimed");
                Ok(ClaimResult::Claimed)
            }
            CreateOutcome::Exists(body) => {
                let existing: ClaimedCode = serde_json::from_value(body)?;
                debug!(
                    code,
                    owner = %existing.claimed_by,
                    rejected_for = shipment_id,
                    "code already claimed"
                );
                Ok(ClaimResult::AlreadyClaimed {
                    existing_owner: existing.claimed_by,
                })
            }
        }
    }

    /// Returns the id of the shipment owning `code`, if any, without
    /// claiming it.
    pub async fn owner_of(&self, code: &str) -> Result<Option<String>, RegistryError> {
        match self.backend.get(&self.collection, code).await? {
            Some(body) => {
                let claim: ClaimedCode = serde_json::from_value(body)?;
                Ok(Some(claim.claimed_by))
            }
            None => Ok(None),
        }
    }

    /// Releases every claim owned by `shipment_id` and returns how many
    /// were released. Called when a shipment is deleted so its codes become
    /// scannable again.
    pub async fn release_for_shipment(&self, shipment_id: &str) -> Result<usize, RegistryError> {
        let docs = self.backend.list(&self.collection).await?;

        let mut released = 0;
        for (code, body) in docs {
            let claim: ClaimedCode = match serde_json::from_value(body) {
                Ok(c) => c,
                Err(e) => {
                    warn!(code, error = %e, "skipping malformed claim document");
                    continue;
                }
            };
            if claim.claimed_by == shipment_id {
                self.backend.delete(&self.collection, &code).await?;
                released += 1;
            }
        }

        if released > 0 {
            info!(shipment = shipment_id, released, "released claims");
        }
        Ok(released)
    }
}
