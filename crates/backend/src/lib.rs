//! Document backend seam for the shiptrack crates.
//!
//! The registry and store talk to the cloud document database through the
//! [`DocumentBackend`] trait instead of a concrete SDK. An application
//! bridges the trait to its managed database client; [`MemoryBackend`] is
//! the bundled in-process implementation used by tests and offline tooling.
//!
//! The one non-negotiable contract is [`DocumentBackend::create_if_absent`]:
//! it must be atomic per key, because the global code-uniqueness rule rests
//! entirely on it. A remote implementation must map it to the database's
//! native transaction or precondition primitive, never to a read followed
//! by a write.

pub mod error;
pub mod memory;
pub mod store;

// Re-export primary types for convenience.
pub use error::BackendError;
pub use memory::MemoryBackend;
pub use store::{BoxFuture, CreateOutcome, DocumentBackend};
