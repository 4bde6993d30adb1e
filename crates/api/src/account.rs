// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account engine: audited login, NDA acknowledgement, and admin user
//! management.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;

use atrium_audit::{AuditRecorder, LoginOutcome};
use atrium_domain::{UserRecord, collections};
use atrium_store::{DocumentId, MemoryStore};

use crate::credentials::{CredentialService, Principal};
use crate::error::{ApiError, ApiResult};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    /// Id of the authenticated user.
    pub user_id: DocumentId,
    /// A fresh session token.
    pub token: String,
    /// The user's profile, with credential material stripped.
    pub user: UserRecord,
}

/// The account engine.
#[derive(Debug, Clone)]
pub struct AccountEngine {
    store: Arc<MemoryStore>,
    audit: AuditRecorder,
}

impl AccountEngine {
    /// Creates the engine over the shared store handle and audit
    /// recorder.
    #[must_use]
    pub const fn new(store: Arc<MemoryStore>, audit: AuditRecorder) -> Self {
        Self { store, audit }
    }

    /// Authenticates a member by email and password.
    ///
    /// Unknown email and wrong password produce the same public
    /// message. Every attempt, successful or not, is recorded by the
    /// audit recorder; recording never delays or fails the login.
    ///
    /// # Errors
    ///
    /// - `Validation` when either field is empty
    /// - `AuthenticationFailed` for unknown email, a soft-deleted
    ///   account, a wrong password, or an account that was never
    ///   activated
    pub fn login(
        &self,
        credentials: &CredentialService,
        email: &str,
        password: &str,
        user_agent: Option<String>,
    ) -> ApiResult<LoginSuccess> {
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation {
                field: String::from("email"),
                message: String::from("Email and password are required."),
            });
        }

        let matches: Vec<(DocumentId, UserRecord)> =
            self.store.query(collections::USERS, |user: &UserRecord| {
                user.email == email && !user.is_deleted
            })?;
        let Some((user_id, user)) = matches.into_iter().next() else {
            return Err(self.failed_login(email, user_agent, "unknown email"));
        };

        let Some(hash) = user.password_hash.as_deref() else {
            self.audit.record_login_attempt(
                email,
                LoginOutcome::Failure {
                    reason: String::from("not activated"),
                },
                user_agent,
            );
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Account not yet activated."),
            });
        };

        if !credentials.verify_password(password, hash)? {
            return Err(self.failed_login(email, user_agent, "wrong password"));
        }

        let principal: Principal =
            Principal::new(user_id.clone(), user.is_admin, user.is_nda_accepted);
        let token: String = credentials.issue_token(&principal)?;

        self.audit
            .record_login_attempt(email, LoginOutcome::Success, user_agent);
        info!(user_id = %user_id, "login succeeded");

        Ok(LoginSuccess {
            user_id,
            token,
            user: sanitize(user),
        })
    }

    /// Marks the NDA as accepted for a member. Idempotent; returns
    /// `true` when it was already accepted.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub fn acknowledge_nda(&self, user_id: &str) -> ApiResult<bool> {
        let already: bool = self.store.run_transaction(|tx| {
            let Some(mut user) = tx.read::<UserRecord>(collections::USERS, user_id)? else {
                return Err(user_not_found());
            };
            if user.is_nda_accepted {
                return Ok(true);
            }
            user.is_nda_accepted = true;
            user.nda_accepted_at = Some(OffsetDateTime::now_utc());
            tx.put(collections::USERS, user_id, &user)?;
            Ok(false)
        })?;

        if !already {
            info!(user_id, "NDA accepted");
        }
        Ok(already)
    }

    /// Reports a member's NDA state and acceptance time.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub fn nda_status(&self, user_id: &str) -> ApiResult<(bool, Option<OffsetDateTime>)> {
        let user: UserRecord = self
            .store
            .get(collections::USERS, user_id)?
            .ok_or_else(user_not_found)?;
        Ok((user.is_nda_accepted, user.nda_accepted_at))
    }

    /// Lists every non-deleted user, sanitized. Admin view.
    ///
    /// # Errors
    ///
    /// Returns a translated store error if the collection cannot be
    /// read.
    pub fn list_users(&self) -> ApiResult<Vec<(DocumentId, UserRecord)>> {
        let mut users: Vec<(DocumentId, UserRecord)> = self
            .store
            .query(collections::USERS, |user: &UserRecord| !user.is_deleted)?;
        users.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(users
            .into_iter()
            .map(|(id, user)| (id, sanitize(user)))
            .collect())
    }

    /// Fetches one user, sanitized. Admin view.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub fn get_user(&self, user_id: &str) -> ApiResult<UserRecord> {
        let user: UserRecord = self
            .store
            .get(collections::USERS, user_id)?
            .ok_or_else(user_not_found)?;
        Ok(sanitize(user))
    }

    /// Soft-deletes a user on behalf of an admin. The document is kept;
    /// `is_deleted` and `deleted_at` are set and the action is recorded
    /// in the admin audit trail.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist or was already
    /// deleted.
    pub fn soft_delete_user(&self, admin_id: &str, user_id: &str) -> ApiResult<()> {
        self.store.run_transaction(|tx| {
            let Some(mut user) = tx.read::<UserRecord>(collections::USERS, user_id)? else {
                return Err(user_not_found());
            };
            if user.is_deleted {
                return Err(user_not_found());
            }
            user.is_deleted = true;
            user.deleted_at = Some(OffsetDateTime::now_utc());
            tx.put(collections::USERS, user_id, &user)?;
            Ok(())
        })?;

        self.audit.record_admin_action(
            admin_id,
            "soft_delete_user",
            format!("soft-deleted user {user_id}"),
        );
        info!(admin_id, user_id, "user soft-deleted");
        Ok(())
    }

    fn failed_login(&self, email: &str, user_agent: Option<String>, reason: &str) -> ApiError {
        self.audit.record_login_attempt(
            email,
            LoginOutcome::Failure {
                reason: reason.to_string(),
            },
            user_agent,
        );
        ApiError::AuthenticationFailed {
            reason: String::from("Invalid credentials."),
        }
    }
}

/// Strips credential material from a record before it leaves the
/// engine.
fn sanitize(mut user: UserRecord) -> UserRecord {
    user.password_hash = None;
    user.access_code = None;
    user
}

fn user_not_found() -> ApiError {
    ApiError::NotFound {
        resource: String::from("User"),
        message: String::from("User not found."),
    }
}
