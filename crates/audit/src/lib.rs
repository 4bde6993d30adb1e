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
    clippy::all
)]

//! Security audit records and the best-effort recorder.
//!
//! Audit writes are advisory: a failed append is logged locally and
//! discarded, and never fails or delays the operation it describes.
//! There is no ordering or atomicity relationship between an audit
//! record and the operation it observes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use atrium_domain::collections;
use atrium_store::{DocumentId, MemoryStore, StoreError};

/// How a login attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginOutcome {
    /// Credentials verified and a token was issued.
    Success,
    /// The attempt failed.
    Failure {
        /// Why the attempt failed (server-side wording; the HTTP
        /// response stays deliberately vague).
        reason: String,
    },
}

/// One recorded login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttemptRecord {
    /// The email the caller attempted to log in with.
    pub email: String,
    /// How the attempt ended.
    pub outcome: LoginOutcome,
    /// The caller's User-Agent header, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// When the attempt happened.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// One recorded admin action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminActionRecord {
    /// The admin who performed the action.
    pub admin_id: String,
    /// Short action name, e.g. "`update_referral_status`".
    pub action: String,
    /// Human-readable detail.
    pub detail: String,
    /// When the action happened.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Best-effort audit recorder.
///
/// Shares the store handle with the engines but only ever appends to
/// the two log collections.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    store: Arc<MemoryStore>,
}

impl AuditRecorder {
    /// Maximum entries returned by the listing read paths.
    const LISTING_LIMIT: usize = 100;

    /// Creates a recorder over the shared store handle.
    #[must_use]
    pub const fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Records a login attempt. Never fails; store errors are logged
    /// and discarded.
    pub fn record_login_attempt(
        &self,
        email: &str,
        outcome: LoginOutcome,
        user_agent: Option<String>,
    ) {
        let record: LoginAttemptRecord = LoginAttemptRecord {
            email: email.to_string(),
            outcome,
            user_agent,
            timestamp: OffsetDateTime::now_utc(),
        };
        if let Err(err) = self.store.add(collections::LOGIN_LOGS, &record) {
            warn!(error = %err, email, "failed to record login attempt");
        }
    }

    /// Records an admin action. Never fails; store errors are logged
    /// and discarded.
    pub fn record_admin_action(&self, admin_id: &str, action: &str, detail: String) {
        let record: AdminActionRecord = AdminActionRecord {
            admin_id: admin_id.to_string(),
            action: action.to_string(),
            detail,
            timestamp: OffsetDateTime::now_utc(),
        };
        if let Err(err) = self.store.add(collections::ADMIN_ACTIONS, &record) {
            warn!(error = %err, admin_id, action, "failed to record admin action");
        }
    }

    /// Lists recorded login attempts, newest first, capped at 100.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the log collection cannot be read.
    pub fn login_attempts(&self) -> Result<Vec<LoginAttemptRecord>, StoreError> {
        let mut records: Vec<(DocumentId, LoginAttemptRecord)> =
            self.store.query(collections::LOGIN_LOGS, |_| true)?;
        records.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
        records.truncate(Self::LISTING_LIMIT);
        Ok(records.into_iter().map(|(_, record)| record).collect())
    }

    /// Lists recorded admin actions, newest first, capped at 100.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the log collection cannot be read.
    pub fn admin_actions(&self) -> Result<Vec<AdminActionRecord>, StoreError> {
        let mut records: Vec<(DocumentId, AdminActionRecord)> =
            self.store.query(collections::ADMIN_ACTIONS, |_| true)?;
        records.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
        records.truncate(Self::LISTING_LIMIT);
        Ok(records.into_iter().map(|(_, record)| record).collect())
    }
}
