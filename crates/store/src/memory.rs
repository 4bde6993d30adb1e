// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The in-memory store backend.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::error::StoreError;
use crate::transaction::Transaction;
use crate::MAX_TRANSACTION_ATTEMPTS;

/// Opaque document identifier. Generated ids are uuid v4 strings.
pub type DocumentId = String;

/// A stored document plus the version counter used for transactional
/// conflict detection.
#[derive(Debug, Clone)]
pub(crate) struct VersionedDocument {
    /// Bumped on every committed write to this document.
    pub version: u64,
    /// The document payload.
    pub data: Value,
}

type Collections = HashMap<String, HashMap<DocumentId, VersionedDocument>>;

/// Process-wide document store.
///
/// All access is internally synchronized; handlers share the store via
/// `Arc<MemoryStore>` without any outer lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches a document by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the stored document does
    /// not deserialize into `T`.
    pub fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let collections = self.collections.read();
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|doc| serde_json::from_value(doc.data.clone()).map_err(StoreError::from))
            .transpose()
    }

    /// Adds a document under a freshly generated id and returns the id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the value cannot be
    /// serialized.
    pub fn add<T: Serialize>(&self, collection: &str, value: &T) -> Result<DocumentId, StoreError> {
        let id: DocumentId = uuid::Uuid::new_v4().to_string();
        self.put(collection, &id, value)?;
        Ok(id)
    }

    /// Writes a full document under the given id, creating or replacing
    /// it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the value cannot be
    /// serialized.
    pub fn put<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let data: Value = serde_json::to_value(value)?;
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();
        let version: u64 = docs.get(id).map_or(1, |existing| existing.version + 1);
        docs.insert(id.to_string(), VersionedDocument { version, data });
        trace!(collection, id, version, "document written");
        Ok(())
    }

    /// Deletes a document; returns whether it existed.
    pub fn delete(&self, collection: &str, id: &str) -> bool {
        let mut collections = self.collections.write();
        collections
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some())
    }

    /// Returns every `(id, document)` pair matching the predicate.
    ///
    /// Order is unspecified; callers sort by their own fields.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if any document in the
    /// collection fails to deserialize into `T`.
    pub fn query<T, P>(&self, collection: &str, predicate: P) -> Result<Vec<(DocumentId, T)>, StoreError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        let collections = self.collections.read();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<(DocumentId, T)> = Vec::new();
        for (id, doc) in docs {
            let value: T = serde_json::from_value(doc.data.clone())?;
            if predicate(&value) {
                matches.push((id.clone(), value));
            }
        }
        Ok(matches)
    }

    /// Returns the number of documents in a collection.
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Runs `f` as an atomic transaction.
    ///
    /// The closure reads through the transaction handle and buffers
    /// writes; nothing is visible to other callers until commit. At
    /// commit every recorded read is revalidated against the current
    /// document versions under the store's write lock — if any changed,
    /// the buffered writes are discarded and `f` is re-run against the
    /// new state, up to [`MAX_TRANSACTION_ATTEMPTS`] times.
    ///
    /// Business failures returned by `f` abort immediately and are
    /// never retried; only commit conflicts retry.
    ///
    /// # Errors
    ///
    /// Returns the closure's error unchanged, or
    /// `StoreError::Contention` (converted into `E`) when the retry
    /// budget is exhausted.
    pub fn run_transaction<T, E, F>(&self, mut f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnMut(&mut Transaction<'_>) -> Result<T, E>,
    {
        for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
            let mut tx: Transaction<'_> = Transaction::new(self);
            let value: T = f(&mut tx)?;
            if tx.commit() {
                return Ok(value);
            }
            trace!(attempt, "transaction conflicted, retrying");
        }
        Err(StoreError::Contention {
            attempts: MAX_TRANSACTION_ATTEMPTS,
        }
        .into())
    }

    /// Reads one document's `(version, payload)` for a transaction.
    pub(crate) fn snapshot(
        &self,
        collection: &str,
        id: &str,
    ) -> Option<(u64, Value)> {
        let collections = self.collections.read();
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|doc| (doc.version, doc.data.clone()))
    }

    /// Scans a collection for a transaction, yielding `(id, version,
    /// payload)` triples. Order is unspecified.
    pub(crate) fn scan(&self, collection: &str) -> Vec<(DocumentId, u64, Value)> {
        let collections = self.collections.read();
        collections.get(collection).map_or_else(Vec::new, |docs| {
            docs.iter()
                .map(|(id, doc)| (id.clone(), doc.version, doc.data.clone()))
                .collect()
        })
    }

    /// Validates recorded reads and applies buffered writes as one
    /// unit. Returns `false` (and applies nothing) when any read is
    /// stale.
    pub(crate) fn commit(
        &self,
        reads: &[(String, DocumentId, Option<u64>)],
        writes: Vec<(String, DocumentId, Option<Value>)>,
    ) -> bool {
        let mut collections = self.collections.write();

        for (collection, id, observed) in reads {
            let current: Option<u64> = collections
                .get(collection)
                .and_then(|docs| docs.get(id))
                .map(|doc| doc.version);
            if current != *observed {
                return false;
            }
        }

        for (collection, id, data) in writes {
            let docs = collections.entry(collection).or_default();
            match data {
                Some(data) => {
                    let version: u64 = docs.get(&id).map_or(1, |existing| existing.version + 1);
                    docs.insert(id, VersionedDocument { version, data });
                }
                None => {
                    docs.remove(&id);
                }
            }
        }
        true
    }
}
