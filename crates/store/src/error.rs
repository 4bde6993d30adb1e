// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A document could not be serialized or deserialized.
    #[error("Document serialization error: {0}")]
    Serialization(String),

    /// A transaction kept conflicting with concurrent writers and ran
    /// out of retry attempts. Safe for the caller to retry later.
    #[error("Transaction aborted after {attempts} conflicting attempts")]
    Contention {
        /// How many times the transaction was attempted.
        attempts: u32,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
