//! Durable shipment collection with live change notification.
//!
//! [`ShipmentStore`] is the only writer of shipment records; UI layers hold
//! a read-only view fed by [`ShipmentSubscription`], a stream of full
//! collection snapshots sorted by due date. Each emission supersedes the
//! previous one, so a consumer that falls behind simply skips intermediate
//! states instead of replaying a diff log.

pub mod error;
pub mod store;
pub mod subscription;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use store::ShipmentStore;
pub use subscription::ShipmentSubscription;
