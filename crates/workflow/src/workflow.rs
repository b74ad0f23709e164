//! Scan handling and shipment lifecycle orchestration.

use chrono::{DateTime, Utc};
use shiptrack_protocol::claim::ClaimResult;
use shiptrack_protocol::shipment::Shipment;
use shiptrack_registry::CodeRegistry;
use shiptrack_store::ShipmentStore;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::WorkflowError;

/// Result of handling one scanned code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The code was claimed and appended to the active shipment.
    Attached {
        code: String,
        /// Codes on the shipment after the append.
        total_codes: usize,
    },
    /// The code already belongs to another shipment; it was discarded.
    Rejected { code: String, owner: String },
}

/// User-visible notifications emitted while a scan session is driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    CodeAttached {
        shipment_id: String,
        code: String,
    },
    CodeRejected {
        shipment_id: String,
        code: String,
        owner: String,
    },
    /// A transient failure: the code was discarded, nothing was mutated on
    /// the claim path, and the user may simply scan again.
    ScanFailed {
        shipment_id: String,
        code: String,
        reason: String,
    },
}

/// Orchestrates scan sessions, the code registry, and the shipment store.
pub struct ShipmentWorkflow {
    store: ShipmentStore,
    registry: CodeRegistry,
    events_tx: mpsc::Sender<WorkflowEvent>,
    events_rx: Mutex<Option<mpsc::Receiver<WorkflowEvent>>>,
}

impl ShipmentWorkflow {
    /// Creates a workflow over the given store and registry.
    pub fn new(store: ShipmentStore, registry: CodeRegistry) -> Self {
        let (events_tx, events_rx) = mpsc::channel(64);
        Self {
            store,
            registry,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub async fn take_events(&self) -> Option<mpsc::Receiver<WorkflowEvent>> {
        self.events_rx.lock().await.take()
    }

    /// The underlying store, for list subscriptions and direct reads.
    pub fn store(&self) -> &ShipmentStore {
        &self.store
    }

    /// Validates and persists a brand-new pending shipment.
    pub async fn create_shipment(
        &self,
        order_number: impl Into<String>,
        client: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Result<Shipment, WorkflowError> {
        let shipment = Shipment::new(order_number, client, due_date);
        shipment.validate()?;
        self.store.upsert(&shipment).await?;
        info!(shipment = %shipment.id, order = %shipment.order_number, "shipment created");
        Ok(shipment)
    }

    /// Validates and persists an edited shipment (the edit-form path).
    pub async fn save_shipment(&self, shipment: &Shipment) -> Result<(), WorkflowError> {
        shipment.validate()?;
        self.store.upsert(shipment).await?;
        Ok(())
    }

    /// Deletes a shipment and releases every code it claimed, so those
    /// codes become scannable again. Returns the number of released codes.
    pub async fn delete_shipment(&self, id: &str) -> Result<usize, WorkflowError> {
        self.store.delete(id).await?;
        let released = self.registry.release_for_shipment(id).await?;
        info!(shipment = id, released, "shipment deleted");
        Ok(released)
    }

    /// Handles one scanned code for the active shipment.
    ///
    /// The claim completes with a definitive outcome strictly before any
    /// append: on `AlreadyClaimed` or a registry failure the shipment is
    /// never touched. An upsert failure *after* a successful claim leaves
    /// the claim in place; that rare partial state is visible (the code
    /// reads as taken) and accepted rather than rolled back.
    pub async fn handle_scanned_code(
        &self,
        code: &str,
        shipment_id: &str,
    ) -> Result<ScanOutcome, WorkflowError> {
        match self.registry.try_claim(code, shipment_id).await? {
            ClaimResult::AlreadyClaimed { existing_owner } => {
                debug!(code, owner = %existing_owner, "scan rejected, code in use");
                Ok(ScanOutcome::Rejected {
                    code: code.to_string(),
                    owner: existing_owner,
                })
            }
            ClaimResult::Claimed => {
                let Some(mut shipment) = self.store.get(shipment_id).await? else {
                    warn!(
                        code,
                        shipment = shipment_id,
                        "code claimed for a shipment that no longer exists"
                    );
                    return Err(WorkflowError::UnknownShipment(shipment_id.to_string()));
                };

                // The session filter makes a within-shipment repeat
                // unreachable in practice; guard anyway so the list stays
                // duplicate-free.
                if !shipment.has_code(code) {
                    shipment.scanned_codes.push(code.to_string());
                }

                if let Err(e) = self.store.upsert(&shipment).await {
                    warn!(
                        code,
                        shipment = shipment_id,
                        error = %e,
                        "code claimed but shipment update failed"
                    );
                    return Err(e.into());
                }

                info!(code, shipment = shipment_id, "code attached");
                Ok(ScanOutcome::Attached {
                    code: code.to_string(),
                    total_codes: shipment.scanned_codes.len(),
                })
            }
        }
    }

    /// Drives a scan session's decoded-code channel for one shipment,
    /// emitting a [`WorkflowEvent`] per code.
    ///
    /// Codes are handled strictly one at a time: the next code is not read
    /// until the previous claim/append completed. Cancellation stops the
    /// intake; a claim already in flight still runs to completion.
    pub async fn run_session(
        &self,
        mut codes: mpsc::Receiver<String>,
        shipment_id: &str,
        cancel: CancellationToken,
    ) {
        loop {
            let code = tokio::select! {
                _ = cancel.cancelled() => break,
                code = codes.recv() => match code {
                    Some(c) => c,
                    None => break,
                },
            };

            let event = match self.handle_scanned_code(&code, shipment_id).await {
                Ok(ScanOutcome::Attached { code, .. }) => WorkflowEvent::CodeAttached {
                    shipment_id: shipment_id.to_string(),
                    code,
                },
                Ok(ScanOutcome::Rejected { code, owner }) => WorkflowEvent::CodeRejected {
                    shipment_id: shipment_id.to_string(),
                    code,
                    owner,
                },
                Err(e) => WorkflowEvent::ScanFailed {
                    shipment_id: shipment_id.to_string(),
                    code,
                    reason: e.to_string(),
                },
            };
            let _ = self.events_tx.send(event).await;
        }

        debug!(shipment = shipment_id, "scan session loop ended");
    }
}
