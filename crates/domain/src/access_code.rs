// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Access code generation.
//!
//! Codes are short, human-typed secrets, so the alphabet excludes the
//! look-alike characters `0`, `O`, `1`, and `I`. Uniqueness is
//! best-effort: with 32^8 possible codes a collision is negligible but
//! not impossible, and nothing enforces it at generation time.

use rand::RngExt;

/// The fixed unambiguous alphabet used for access codes.
pub const ACCESS_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a generated access code.
pub const ACCESS_CODE_LENGTH: usize = 8;

/// Generates a fresh access code.
#[must_use]
pub fn generate_access_code() -> String {
    let mut rng = rand::rng();
    (0..ACCESS_CODE_LENGTH)
        .map(|_| {
            let index: usize = rng.random_range(0..ACCESS_CODE_ALPHABET.len());
            char::from(ACCESS_CODE_ALPHABET[index])
        })
        .collect()
}
