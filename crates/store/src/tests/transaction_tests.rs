// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use crate::tests::{Counter, counter};
use crate::{DocumentId, MAX_TRANSACTION_ATTEMPTS, MemoryStore, StoreError};

#[test]
fn transaction_applies_buffered_writes_on_commit() {
    let store: MemoryStore = MemoryStore::new();
    let id: DocumentId = store.add("counters", &counter("a", 1)).expect("add");

    store
        .run_transaction::<_, StoreError, _>(|tx| {
            let current: Counter = tx.read("counters", &id)?.expect("document exists");
            tx.put("counters", &id, &counter(&current.label, current.value + 1))?;
            Ok(())
        })
        .expect("transaction");

    let fetched: Option<Counter> = store.get("counters", &id).expect("get");
    assert_eq!(fetched, Some(counter("a", 2)));
}

#[test]
fn closure_error_aborts_without_writing() {
    let store: MemoryStore = MemoryStore::new();
    let id: DocumentId = store.add("counters", &counter("a", 1)).expect("add");

    let result: Result<(), StoreError> = store.run_transaction(|tx| {
        tx.put("counters", &id, &counter("a", 99))?;
        Err(StoreError::Serialization(String::from("business abort")))
    });

    assert!(result.is_err());
    let fetched: Option<Counter> = store.get("counters", &id).expect("get");
    assert_eq!(fetched, Some(counter("a", 1)));
}

#[test]
fn creates_inside_transactions_are_visible_after_commit() {
    let store: MemoryStore = MemoryStore::new();

    let id: DocumentId = store
        .run_transaction::<_, StoreError, _>(|tx| tx.create("counters", &counter("made", 5)))
        .expect("transaction");

    let fetched: Option<Counter> = store.get("counters", &id).expect("get");
    assert_eq!(fetched, Some(counter("made", 5)));
}

#[test]
fn transactional_delete_removes_the_document() {
    let store: MemoryStore = MemoryStore::new();
    let id: DocumentId = store.add("counters", &counter("a", 1)).expect("add");

    store
        .run_transaction::<_, StoreError, _>(|tx| {
            let _: Option<Counter> = tx.read("counters", &id)?;
            tx.delete("counters", &id);
            Ok(())
        })
        .expect("transaction");

    assert_eq!(store.count("counters"), 0);
}

#[test]
fn conflicting_writer_forces_a_retry_against_fresh_state() {
    let store: MemoryStore = MemoryStore::new();
    let id: DocumentId = store.add("counters", &counter("a", 0)).expect("add");

    let mut attempts: u32 = 0;
    store
        .run_transaction::<_, StoreError, _>(|tx| {
            attempts += 1;
            let current: Counter = tx.read("counters", &id)?.expect("document exists");
            if attempts == 1 {
                // Concurrent writer lands between this attempt's read
                // and its commit, invalidating the recorded version.
                store.put("counters", &id, &counter("a", 100))?;
            }
            tx.put("counters", &id, &counter("a", current.value + 1))?;
            Ok(())
        })
        .expect("transaction");

    assert_eq!(attempts, 2);
    // The retry saw the interleaved write, so the increment lands on
    // top of it instead of clobbering it.
    let fetched: Option<Counter> = store.get("counters", &id).expect("get");
    assert_eq!(fetched, Some(counter("a", 101)));
}

#[test]
fn persistent_conflicts_exhaust_the_retry_budget() {
    let store: MemoryStore = MemoryStore::new();
    let id: DocumentId = store.add("counters", &counter("a", 0)).expect("add");

    let mut attempts: u32 = 0;
    let result: Result<(), StoreError> = store.run_transaction(|tx| {
        attempts += 1;
        let current: Counter = tx.read("counters", &id)?.expect("document exists");
        store.put("counters", &id, &current)?;
        tx.put("counters", &id, &counter("a", current.value + 1))?;
        Ok(())
    });

    assert_eq!(attempts, MAX_TRANSACTION_ATTEMPTS);
    assert_eq!(
        result,
        Err(StoreError::Contention {
            attempts: MAX_TRANSACTION_ATTEMPTS,
        })
    );
}

#[test]
fn recorded_absence_conflicts_with_a_concurrent_create() {
    let store: MemoryStore = MemoryStore::new();

    let mut attempts: u32 = 0;
    store
        .run_transaction::<_, StoreError, _>(|tx| {
            attempts += 1;
            let existing: Option<Counter> = tx.read("counters", "fixed-id")?;
            if attempts == 1 {
                assert!(existing.is_none());
                store.put("counters", "fixed-id", &counter("raced", 1))?;
            }
            // Second attempt sees the concurrently created document.
            tx.put("counters", "other-id", &counter("b", 1))?;
            Ok(())
        })
        .expect("transaction");

    assert_eq!(attempts, 2);
}

#[test]
fn concurrent_increments_never_lose_updates() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let id: DocumentId = store.add("counters", &counter("shared", 0)).expect("add");

    let threads: u64 = 8;
    let increments_per_thread: u64 = 25;
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let store: Arc<MemoryStore> = Arc::clone(&store);
            let id: DocumentId = id.clone();
            std::thread::spawn(move || {
                for _ in 0..increments_per_thread {
                    // A lost update would need this whole read-modify-
                    // write to race; retry on contention keeps going.
                    loop {
                        let result: Result<(), StoreError> = store.run_transaction(|tx| {
                            let current: Counter =
                                tx.read("counters", &id)?.expect("document exists");
                            tx.put(
                                "counters",
                                &id,
                                &counter("shared", current.value + 1),
                            )?;
                            Ok(())
                        });
                        match result {
                            Ok(()) => break,
                            Err(StoreError::Contention { .. }) => {}
                            Err(other) => panic!("unexpected store error: {other}"),
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread");
    }

    let fetched: Option<Counter> = store.get("counters", &id).expect("get");
    assert_eq!(fetched, Some(counter("shared", threads * increments_per_thread)));
}
