// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error taxonomy for the operation layer.

use atrium_domain::DomainError;
use atrium_store::StoreError;

use crate::credentials::CredentialError;

/// Result alias used throughout the operation layer.
pub type ApiResult<T> = Result<T, ApiError>;

/// API-level errors.
///
/// These are the only failures the transport layer ever sees; store,
/// domain, and credential errors are translated here and never leak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or missing input. The caller's fault; never retried.
    Validation {
        /// The offending field.
        field: String,
        /// A human-readable description of the problem.
        message: String,
    },
    /// Missing, invalid, or expired credentials.
    AuthenticationFailed {
        /// A human-readable reason safe to show the caller.
        reason: String,
    },
    /// Valid identity, insufficient role or state.
    Forbidden {
        /// A human-readable description of the missing requirement.
        message: String,
    },
    /// The referenced entity does not exist.
    NotFound {
        /// The type of resource that was not found.
        resource: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operation would violate an invariant.
    Conflict {
        /// The rule that would be violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Transient store contention; the operation was retried in-store
    /// and still failed. Safe for the caller to retry later.
    Contention {
        /// A description of the contention.
        message: String,
    },
    /// An unexpected internal failure.
    Internal {
        /// A description of the internal error. Logged server-side;
        /// not echoed verbatim to the caller.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { message } => write!(f, "{message}"),
            Self::NotFound { resource, message } => {
                write!(f, "{resource} not found: {message}")
            }
            Self::Conflict { rule, message } => {
                write!(f, "Conflict ({rule}): {message}")
            }
            Self::Contention { message } => write!(f, "Operation contended: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Contention { attempts } => Self::Contention {
                message: format!("store transaction conflicted {attempts} times"),
            },
            StoreError::Serialization(message) => Self::Internal { message },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let field: &str = match &err {
            DomainError::InvalidReferralStatus(_) | DomainError::InvalidRewardState(_) => "status",
            DomainError::InvalidEmail(_) => "email",
            DomainError::EmptyField { field } => field,
            DomainError::InvalidBookingDates { .. } => "check_in",
            DomainError::InvalidEventCapacity => "max_capacity",
        };
        Self::Validation {
            field: field.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::TokenInvalid(reason) => Self::AuthenticationFailed {
                reason: format!("Invalid or expired token: {reason}"),
            },
            CredentialError::Hashing(message) | CredentialError::TokenIssue(message) => {
                Self::Internal { message }
            }
        }
    }
}
