//! Camera scan session.
//!
//! Wraps a camera input device behind the [`ScanDevice`] trait and turns
//! its raw per-frame detections into a de-duplicated stream of decoded
//! codes. The camera keeps recognizing the same symbol on every frame while
//! it is in view; [`ScanSession`] filters those repeats for the lifetime of
//! the session so the consumer sees each value exactly once.
//!
//! This session-local filter is distinct from the cross-shipment uniqueness
//! rule, which the code registry enforces.

pub mod error;
pub mod session;

// Re-export primary types for convenience.
pub use error::ScanError;
pub use session::{BoxFuture, ScanDevice, ScanSession};
