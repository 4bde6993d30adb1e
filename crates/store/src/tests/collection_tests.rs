// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{Counter, counter};
use crate::{DocumentId, MemoryStore};

#[test]
fn add_then_get_round_trips() {
    let store: MemoryStore = MemoryStore::new();
    let id: DocumentId = store.add("counters", &counter("a", 1)).expect("add");

    let fetched: Option<Counter> = store.get("counters", &id).expect("get");
    assert_eq!(fetched, Some(counter("a", 1)));
}

#[test]
fn get_missing_document_returns_none() {
    let store: MemoryStore = MemoryStore::new();
    let fetched: Option<Counter> = store.get("counters", "no-such-id").expect("get");
    assert_eq!(fetched, None);
}

#[test]
fn generated_ids_are_distinct() {
    let store: MemoryStore = MemoryStore::new();
    let first: DocumentId = store.add("counters", &counter("a", 1)).expect("add");
    let second: DocumentId = store.add("counters", &counter("b", 2)).expect("add");
    assert_ne!(first, second);
    assert_eq!(store.count("counters"), 2);
}

#[test]
fn put_replaces_the_full_document() {
    let store: MemoryStore = MemoryStore::new();
    let id: DocumentId = store.add("counters", &counter("a", 1)).expect("add");
    store.put("counters", &id, &counter("a", 7)).expect("put");

    let fetched: Option<Counter> = store.get("counters", &id).expect("get");
    assert_eq!(fetched, Some(counter("a", 7)));
    assert_eq!(store.count("counters"), 1);
}

#[test]
fn delete_reports_whether_the_document_existed() {
    let store: MemoryStore = MemoryStore::new();
    let id: DocumentId = store.add("counters", &counter("a", 1)).expect("add");

    assert!(store.delete("counters", &id));
    assert!(!store.delete("counters", &id));
    let fetched: Option<Counter> = store.get("counters", &id).expect("get");
    assert_eq!(fetched, None);
}

#[test]
fn query_filters_by_predicate() {
    let store: MemoryStore = MemoryStore::new();
    store.add("counters", &counter("keep", 10)).expect("add");
    store.add("counters", &counter("keep", 20)).expect("add");
    store.add("counters", &counter("drop", 30)).expect("add");

    let matches: Vec<(DocumentId, Counter)> = store
        .query("counters", |c: &Counter| c.label == "keep")
        .expect("query");
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|(_, c)| c.label == "keep"));
}

#[test]
fn query_on_missing_collection_is_empty() {
    let store: MemoryStore = MemoryStore::new();
    let matches: Vec<(DocumentId, Counter)> =
        store.query("nothing", |_: &Counter| true).expect("query");
    assert!(matches.is_empty());
    assert_eq!(store.count("nothing"), 0);
}
