//! Document types shared by the shiptrack crates.
//!
//! These structs serialize to the exact flat JSON documents the production
//! database already holds (Spanish field names, millisecond timestamps), so
//! a rewrite of any one component stays wire-compatible with the others.
//!
//! # Contents
//!
//! - **Shipment** — one production order, accumulating scanned codes
//! - **ClaimedCode** — a scan code bound to exactly one shipment
//! - **Validation** — required-field checks run before any store call

pub mod claim;
pub mod constants;
pub mod shipment;

// Re-export primary types for convenience.
pub use claim::{ClaimResult, ClaimedCode};
pub use shipment::{Shipment, ShipmentStatus, ValidationError};
