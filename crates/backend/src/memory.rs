//! In-process document backend.
//!
//! Holds every collection under a single mutex, which makes
//! `create_if_absent` genuinely atomic. An `offline` switch lets tests and
//! tooling simulate an unreachable store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use crate::error::BackendError;
use crate::store::{BoxFuture, CreateOutcome, DocumentBackend};

#[derive(Debug)]
struct Collection {
    docs: BTreeMap<String, Value>,
    rev: u64,
    rev_tx: watch::Sender<u64>,
}

impl Collection {
    fn new() -> Self {
        let (rev_tx, _) = watch::channel(0);
        Self {
            docs: BTreeMap::new(),
            rev: 0,
            rev_tx,
        }
    }

    fn bump(&mut self) {
        self.rev += 1;
        let _ = self.rev_tx.send(self.rev);
    }
}

/// In-memory [`DocumentBackend`] implementation.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: Mutex<HashMap<String, Collection>>,
    offline: AtomicBool,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates loss (or recovery) of the connection to the store. While
    /// offline, every fallible operation fails with
    /// [`BackendError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
        debug!(offline, "memory backend availability changed");
    }

    fn check_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::Relaxed) {
            Err(BackendError::Unavailable("backend offline".into()))
        } else {
            Ok(())
        }
    }

    /// Runs `f` on the named collection, creating it on first touch.
    fn with_collection<T>(&self, collection: &str, f: impl FnOnce(&mut Collection) -> T) -> T {
        let mut collections = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        let coll = collections
            .entry(collection.to_string())
            .or_insert_with(Collection::new);
        f(coll)
    }
}

impl DocumentBackend for MemoryBackend {
    fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> BoxFuture<'_, Result<Option<Value>, BackendError>> {
        let result = self
            .check_online()
            .map(|()| self.with_collection(collection, |c| c.docs.get(key).cloned()));
        Box::pin(async move { result })
    }

    fn put(
        &self,
        collection: &str,
        key: &str,
        doc: Value,
    ) -> BoxFuture<'_, Result<(), BackendError>> {
        let result = self.check_online().map(|()| {
            self.with_collection(collection, |c| {
                c.docs.insert(key.to_string(), doc);
                c.bump();
            })
        });
        Box::pin(async move { result })
    }

    fn create_if_absent(
        &self,
        collection: &str,
        key: &str,
        doc: Value,
    ) -> BoxFuture<'_, Result<CreateOutcome, BackendError>> {
        let result = self.check_online().map(|()| {
            self.with_collection(collection, |c| match c.docs.get(key) {
                Some(existing) => CreateOutcome::Exists(existing.clone()),
                None => {
                    c.docs.insert(key.to_string(), doc);
                    c.bump();
                    CreateOutcome::Created
                }
            })
        });
        Box::pin(async move { result })
    }

    fn delete(&self, collection: &str, key: &str) -> BoxFuture<'_, Result<(), BackendError>> {
        let result = self.check_online().map(|()| {
            self.with_collection(collection, |c| {
                if c.docs.remove(key).is_some() {
                    c.bump();
                }
            })
        });
        Box::pin(async move { result })
    }

    fn list(
        &self,
        collection: &str,
    ) -> BoxFuture<'_, Result<Vec<(String, Value)>, BackendError>> {
        let result = self.check_online().map(|()| {
            self.with_collection(collection, |c| {
                c.docs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
        });
        Box::pin(async move { result })
    }

    fn watch(&self, collection: &str) -> watch::Receiver<u64> {
        self.with_collection(collection, |c| c.rev_tx.subscribe())
    }
}
