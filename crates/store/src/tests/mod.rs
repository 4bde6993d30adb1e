// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the store crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod collection_tests;
mod transaction_tests;

use serde::{Deserialize, Serialize};

/// Minimal document used across store tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub label: String,
    pub value: u64,
}

pub fn counter(label: &str, value: u64) -> Counter {
    Counter {
        label: String::from(label),
        value,
    }
}
