// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional read-and-write handle.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;
use crate::memory::{DocumentId, MemoryStore};

/// A single transaction attempt.
///
/// Reads record the version (or absence) of each observed document;
/// writes are buffered. [`MemoryStore::run_transaction`] commits the
/// attempt, revalidating every recorded read under the store's write
/// lock so the whole read-decide-write unit is serialized against
/// conflicting writers.
pub struct Transaction<'a> {
    store: &'a MemoryStore,
    reads: Vec<(String, DocumentId, Option<u64>)>,
    writes: Vec<(String, DocumentId, Option<Value>)>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(store: &'a MemoryStore) -> Self {
        Self {
            store,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Reads a document and records its version for commit validation.
    /// Absence is recorded too: the commit fails if the document is
    /// created concurrently.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the stored document does
    /// not deserialize into `T`.
    pub fn read<T: DeserializeOwned>(
        &mut self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        match self.store.snapshot(collection, id) {
            Some((version, data)) => {
                self.reads
                    .push((collection.to_string(), id.to_string(), Some(version)));
                Ok(Some(serde_json::from_value(data)?))
            }
            None => {
                self.reads.push((collection.to_string(), id.to_string(), None));
                Ok(None)
            }
        }
    }

    /// Finds one document matching the predicate and records its
    /// version. Match order is unspecified.
    ///
    /// A miss is not revalidated at commit: this protects invariants
    /// expressed as preconditions on the matched document (the claim
    /// path), not global uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if a scanned document fails
    /// to deserialize into `T`.
    pub fn find_first<T, P>(
        &mut self,
        collection: &str,
        predicate: P,
    ) -> Result<Option<(DocumentId, T)>, StoreError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        for (id, version, data) in self.store.scan(collection) {
            let value: T = serde_json::from_value(data)?;
            if predicate(&value) {
                self.reads
                    .push((collection.to_string(), id.clone(), Some(version)));
                return Ok(Some((id, value)));
            }
        }
        Ok(None)
    }

    /// Buffers a full-document write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the value cannot be
    /// serialized.
    pub fn put<T: Serialize>(
        &mut self,
        collection: &str,
        id: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let data: Value = serde_json::to_value(value)?;
        self.writes
            .push((collection.to_string(), id.to_string(), Some(data)));
        Ok(())
    }

    /// Buffers a create under a freshly generated id and returns the id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the value cannot be
    /// serialized.
    pub fn create<T: Serialize>(
        &mut self,
        collection: &str,
        value: &T,
    ) -> Result<DocumentId, StoreError> {
        let id: DocumentId = uuid::Uuid::new_v4().to_string();
        self.put(collection, &id, value)?;
        Ok(id)
    }

    /// Buffers a delete.
    pub fn delete(&mut self, collection: &str, id: &str) {
        self.writes
            .push((collection.to_string(), id.to_string(), None));
    }

    /// Validates reads and applies writes atomically. Returns whether
    /// the commit succeeded.
    pub(crate) fn commit(self) -> bool {
        self.store.commit(&self.reads, self.writes)
    }
}
