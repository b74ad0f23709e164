//! Snapshot stream for the shipment collection.

use shiptrack_protocol::shipment::Shipment;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::store::ShipmentStore;

/// A live subscription to full-collection snapshots.
///
/// `recv()` yields the current collection immediately on first call, then
/// waits for the next observed change. Emissions carry complete state, not
/// diffs, and are sorted by due date ascending.
pub struct ShipmentSubscription {
    store: ShipmentStore,
    rx: watch::Receiver<u64>,
    primed: bool,
}

impl ShipmentSubscription {
    pub(crate) fn new(store: ShipmentStore, rx: watch::Receiver<u64>) -> Self {
        Self {
            store,
            rx,
            primed: false,
        }
    }

    /// Waits for the next snapshot.
    ///
    /// Changes that land between two calls coalesce: the returned snapshot
    /// always reflects the collection as of the read, superseding anything
    /// missed in between.
    pub async fn recv(&mut self) -> Result<Vec<Shipment>, StoreError> {
        if self.primed {
            self.rx
                .changed()
                .await
                .map_err(|_| StoreError::Persistence("store watch closed".into()))?;
        } else {
            self.primed = true;
        }
        self.store.snapshot().await
    }
}
