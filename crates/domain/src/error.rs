// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The value is not a vetting-pipeline status.
    InvalidReferralStatus(String),
    /// The value is not a reward state.
    InvalidRewardState(String),
    /// An email address is empty or structurally invalid.
    InvalidEmail(String),
    /// A required field is empty.
    EmptyField {
        /// The field that was empty.
        field: &'static str,
    },
    /// A booking's check-in is not strictly before its check-out.
    InvalidBookingDates {
        /// The supplied check-in timestamp (RFC 3339).
        check_in: String,
        /// The supplied check-out timestamp (RFC 3339).
        check_out: String,
    },
    /// An event capacity of zero was supplied.
    InvalidEventCapacity,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReferralStatus(value) => {
                write!(f, "'{value}' is not a valid vetting-pipeline status")
            }
            Self::InvalidRewardState(value) => {
                write!(f, "'{value}' is not a valid reward status")
            }
            Self::InvalidEmail(value) => write!(f, "'{value}' is not a valid email address"),
            Self::EmptyField { field } => write!(f, "Field '{field}' must not be empty"),
            Self::InvalidBookingDates {
                check_in,
                check_out,
            } => {
                write!(
                    f,
                    "Check-in ({check_in}) must be strictly before check-out ({check_out})"
                )
            }
            Self::InvalidEventCapacity => {
                write!(f, "Event capacity must be greater than zero when set")
            }
        }
    }
}

impl std::error::Error for DomainError {}
