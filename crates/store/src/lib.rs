// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Collection-oriented document store with atomic transactions.
//!
//! Documents are JSON values keyed by opaque string ids and carry a
//! monotonic version. Plain operations (`get`, `add`, `put`, `delete`,
//! `query`) act on single documents. Cross-document invariants go
//! through [`MemoryStore::run_transaction`], which validates every
//! observed version at commit time and transparently retries the
//! closure when a concurrent writer invalidated a read.
//!
//! The store is the only shared mutable resource in the system; it is
//! constructed once and handed to each engine behind an `Arc`, so tests
//! can build an isolated instance per case.

mod error;
mod memory;
mod transaction;

#[cfg(test)]
mod tests;

pub use error::StoreError;
pub use memory::{DocumentId, MemoryStore};
pub use transaction::Transaction;

/// Maximum number of times a transaction closure is re-run after a
/// commit conflict before the attempt surfaces as contention.
pub const MAX_TRANSACTION_ATTEMPTS: u32 = 5;
