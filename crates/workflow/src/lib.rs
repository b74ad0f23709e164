//! Shipment workflow — the cross-component business logic.
//!
//! Everything else in the workspace is a single concern (types, storage,
//! claims, scanning); this crate wires them together. The one correctness
//! property it owns: a code is appended to a shipment only after the
//! registry has returned a definitive `Claimed` for it, so two shipments
//! can never end up sharing a code.

pub mod error;
pub mod workflow;

// Re-export primary types for convenience.
pub use error::WorkflowError;
pub use workflow::{ScanOutcome, ShipmentWorkflow, WorkflowEvent};
