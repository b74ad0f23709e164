//! Shipment CRUD over the document backend.

use std::sync::Arc;

use serde_json::Value;
use shiptrack_backend::DocumentBackend;
use shiptrack_protocol::constants::SHIPMENTS_COLLECTION;
use shiptrack_protocol::shipment::Shipment;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::subscription::ShipmentSubscription;

/// Authoritative collection of shipment records.
#[derive(Clone)]
pub struct ShipmentStore {
    backend: Arc<dyn DocumentBackend>,
    collection: String,
}

impl ShipmentStore {
    /// Creates a store over the default shipment collection.
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self::with_collection(backend, SHIPMENTS_COLLECTION)
    }

    /// Creates a store over a custom collection name.
    pub fn with_collection(backend: Arc<dyn DocumentBackend>, collection: impl Into<String>) -> Self {
        Self {
            backend,
            collection: collection.into(),
        }
    }

    /// Creates the record if the id is new, otherwise overwrites all fields
    /// of the existing record.
    pub async fn upsert(&self, shipment: &Shipment) -> Result<(), StoreError> {
        let doc = serde_json::to_value(shipment)?;
        self.backend
            .put(&self.collection, &shipment.id, doc)
            .await?;
        debug!(shipment = %shipment.id, "shipment upserted");
        Ok(())
    }

    /// Loads a shipment by id.
    pub async fn get(&self, id: &str) -> Result<Option<Shipment>, StoreError> {
        match self.backend.get(&self.collection, id).await? {
            Some(body) => {
                let mut shipment: Shipment = serde_json::from_value(body)?;
                shipment.id = id.to_string();
                Ok(Some(shipment))
            }
            None => Ok(None),
        }
    }

    /// Removes a shipment record. Deleting an already-absent id is not an
    /// error.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.backend.delete(&self.collection, id).await?;
        debug!(shipment = id, "shipment deleted");
        Ok(())
    }

    /// Subscribes to full-collection snapshots.
    ///
    /// The first `recv()` yields the current state immediately; every
    /// mutation of the collection eventually produces a fresh snapshot.
    pub fn subscribe(&self) -> ShipmentSubscription {
        let rx = self.backend.watch(&self.collection);
        ShipmentSubscription::new(self.clone(), rx)
    }

    /// Reads the current full collection, sorted by due date ascending
    /// (ties broken by id for a stable order). Documents that fail to
    /// decode are skipped.
    pub async fn snapshot(&self) -> Result<Vec<Shipment>, StoreError> {
        let docs = self.backend.list(&self.collection).await?;

        let mut shipments: Vec<Shipment> = docs
            .into_iter()
            .filter_map(|(id, body)| decode_shipment(&id, body))
            .collect();
        shipments.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
        Ok(shipments)
    }
}

/// Decodes a document body into a [`Shipment`], restoring the id from the
/// document key. Returns `None` (with a warning) for undecodable bodies so
/// one bad record cannot take down the whole snapshot.
fn decode_shipment(id: &str, body: Value) -> Option<Shipment> {
    match serde_json::from_value::<Shipment>(body) {
        Ok(mut shipment) => {
            shipment.id = id.to_string();
            Some(shipment)
        }
        Err(e) => {
            warn!(shipment = id, error = %e, "skipping undecodable shipment document");
            None
        }
    }
}
