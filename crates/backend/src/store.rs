//! The async document backend trait.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tokio::sync::watch;

use crate::error::BackendError;

/// Boxed future returned by [`DocumentBackend`] methods, keeping the trait
/// object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of an atomic check-and-create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No document existed under the key; the new one was written.
    Created,
    /// A document already existed; nothing was written. Carries the
    /// existing body so callers can inspect it without a second read.
    Exists(Value),
}

/// Abstract collection-of-documents storage.
///
/// Documents are flat JSON bodies addressed by `(collection, key)`. All
/// operations are remote calls from the caller's point of view: potentially
/// long-latency, and failing with [`BackendError::Unavailable`] when the
/// store cannot be reached.
pub trait DocumentBackend: Send + Sync {
    /// Reads a document body, or `None` if the key is absent.
    fn get(&self, collection: &str, key: &str)
    -> BoxFuture<'_, Result<Option<Value>, BackendError>>;

    /// Creates or fully overwrites a document.
    fn put(&self, collection: &str, key: &str, doc: Value)
    -> BoxFuture<'_, Result<(), BackendError>>;

    /// Atomically creates the document only if the key is absent.
    ///
    /// Concurrent calls for the same key must never both observe
    /// [`CreateOutcome::Created`]. Calls on different keys are independent.
    fn create_if_absent(
        &self,
        collection: &str,
        key: &str,
        doc: Value,
    ) -> BoxFuture<'_, Result<CreateOutcome, BackendError>>;

    /// Removes a document. Deleting an absent key is not an error.
    fn delete(&self, collection: &str, key: &str) -> BoxFuture<'_, Result<(), BackendError>>;

    /// Returns all documents in a collection as `(key, body)` pairs, in
    /// unspecified order.
    fn list(&self, collection: &str) -> BoxFuture<'_, Result<Vec<(String, Value)>, BackendError>>;

    /// Returns a receiver for the collection's revision counter.
    ///
    /// The counter is bumped after every successful mutation of the
    /// collection; subscribers re-read the collection when it changes.
    /// Watch semantics apply: rapid successive mutations may coalesce into
    /// one observed change.
    fn watch(&self, collection: &str) -> watch::Receiver<u64>;
}
