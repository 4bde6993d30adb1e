// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role and state guards.
//!
//! Guards are pure predicates over the [`Principal`]: no I/O, no
//! mutation. They stack on top of token verification at the server
//! boundary.

use crate::credentials::Principal;
use crate::error::ApiError;

/// Requires admin privilege.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` unless the principal is an admin.
pub fn require_admin(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden {
            message: String::from("Access denied. Admin privileges are required."),
        })
    }
}

/// Requires NDA acceptance.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` unless the principal has accepted the
/// NDA.
pub fn require_nda_accepted(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_nda_accepted {
        Ok(())
    } else {
        Err(ApiError::Forbidden {
            message: String::from("Access denied. You must accept the NDA to proceed."),
        })
    }
}
