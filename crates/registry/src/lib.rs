//! Global code-claim registry.
//!
//! Single source of truth for which scan codes are already bound to a
//! shipment. The uniqueness rule is system-wide: concurrent claims on the
//! same code from different screens or devices must resolve to exactly one
//! winner, which is why every claim goes through the backend's atomic
//! check-and-create instead of a read followed by a write.

pub mod error;
pub mod registry;

// Re-export primary types for convenience.
pub use error::RegistryError;
pub use registry::CodeRegistry;
