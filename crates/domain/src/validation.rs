// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation shared by the engines.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::DomainError;

/// Validates an email address.
///
/// This is deliberately shallow: non-empty, contains one `@` with
/// characters on both sides, no whitespace. Deliverability is the
/// identity layer's concern.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address fails the checks.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidEmail(email.to_string());

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let Some((local, host)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty() || host.is_empty() || host.contains('@') {
        return Err(invalid());
    }
    Ok(())
}

/// Validates that a booking's check-in is strictly before its check-out.
///
/// # Errors
///
/// Returns `DomainError::InvalidBookingDates` otherwise.
pub fn validate_booking_dates(
    check_in: OffsetDateTime,
    check_out: OffsetDateTime,
) -> Result<(), DomainError> {
    if check_in < check_out {
        Ok(())
    } else {
        Err(DomainError::InvalidBookingDates {
            check_in: format_rfc3339(check_in),
            check_out: format_rfc3339(check_out),
        })
    }
}

/// Validates an optional event capacity: when set, it must be positive.
///
/// # Errors
///
/// Returns `DomainError::InvalidEventCapacity` for a zero capacity.
pub fn validate_event_capacity(max_capacity: Option<u32>) -> Result<(), DomainError> {
    match max_capacity {
        Some(0) => Err(DomainError::InvalidEventCapacity),
        _ => Ok(()),
    }
}

fn format_rfc3339(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.to_string())
}
