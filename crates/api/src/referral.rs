// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Referral and reward engine.
//!
//! Sole writer of referral documents, reward documents, and the
//! invited-user claim path. The Approved transition is the only place
//! in the system that creates rewards, and it does so in one atomic
//! transaction gated on the referral's `reward_status`, so a reward is
//! created at most once per referral no matter how often the
//! transition is retried or raced.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;

use atrium_domain::{
    DEFAULT_REWARD_TYPE, ReferralRecord, ReferralStatus, RewardRecord, RewardState, RewardStatus,
    UserRecord, collections, generate_access_code, validate_email,
};
use atrium_store::{DocumentId, MemoryStore};

use crate::credentials::{CredentialService, Principal};
use crate::error::{ApiError, ApiResult};

/// Result of a successful invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteOutcome {
    /// Id of the created referral document.
    pub referral_id: DocumentId,
    /// The plaintext access code. Shown once; not retrievable later.
    pub access_code: String,
}

/// Result of a successful access-code claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// Id of the activated user.
    pub user_id: DocumentId,
    /// A session token for the freshly activated account.
    pub token: String,
}

/// The referral and reward engine.
#[derive(Debug, Clone)]
pub struct ReferralEngine {
    store: Arc<MemoryStore>,
}

impl ReferralEngine {
    /// Creates the engine over the shared store handle.
    #[must_use]
    pub const fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Invites a new candidate on behalf of a member.
    ///
    /// Creates an invited user (access code, no password) and a
    /// referral in `Invited`/`Pending` state. The duplicate-email check
    /// is a plain query, not part of a transaction: two simultaneous
    /// invites for the same email can in principle both pass it. That
    /// race is accepted as-is; the single-use claim path still admits
    /// only one account per access code.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty name or malformed email
    /// - `Conflict` if a non-deleted user already has the email
    pub fn invite(
        &self,
        referrer_id: &str,
        referred_name: &str,
        referred_email: &str,
    ) -> ApiResult<InviteOutcome> {
        if referred_name.trim().is_empty() {
            return Err(ApiError::Validation {
                field: String::from("referred_name"),
                message: String::from("The referred person's name and email are required."),
            });
        }
        validate_email(referred_email)?;

        let existing: Vec<(DocumentId, UserRecord)> =
            self.store.query(collections::USERS, |user: &UserRecord| {
                user.email == referred_email && !user.is_deleted
            })?;
        if !existing.is_empty() {
            return Err(ApiError::Conflict {
                rule: String::from("unique_email"),
                message: String::from("This person is already a member or has been invited."),
            });
        }

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let access_code: String = generate_access_code();
        let user: UserRecord = UserRecord::invited(
            referred_name.to_string(),
            referred_email.to_string(),
            access_code.clone(),
            Some(referrer_id.to_string()),
            now,
        );
        let referred_user_id: DocumentId = self.store.add(collections::USERS, &user)?;

        let referral: ReferralRecord = ReferralRecord {
            referrer_id: referrer_id.to_string(),
            referred_user_id,
            referred_name: referred_name.to_string(),
            referred_email: referred_email.to_string(),
            status: ReferralStatus::Invited,
            reward_status: RewardStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let referral_id: DocumentId = self.store.add(collections::REFERRALS, &referral)?;

        info!(referrer_id, referral_id = %referral_id, "invitation created");
        Ok(InviteOutcome {
            referral_id,
            access_code,
        })
    }

    /// Claims an access code, activating the invited account.
    ///
    /// The password is hashed before the transaction opens (the slow
    /// hash must not be re-run on transaction retry); the transaction
    /// then re-checks `is_claimed` against the authoritative document,
    /// so of two concurrent claims exactly one commits and the other
    /// fails with the same conflict a sequential second claim gets.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty code or password
    /// - `NotFound` if no user carries the code
    /// - `Conflict` if the code was already used
    pub fn claim_code(
        &self,
        credentials: &CredentialService,
        access_code: &str,
        password: &str,
    ) -> ApiResult<ClaimOutcome> {
        if access_code.is_empty() || password.is_empty() {
            return Err(ApiError::Validation {
                field: String::from("access_code"),
                message: String::from("Access code and password are required."),
            });
        }

        let matches: Vec<(DocumentId, UserRecord)> =
            self.store.query(collections::USERS, |user: &UserRecord| {
                user.access_code.as_deref() == Some(access_code)
            })?;
        let Some((_, user)) = matches.into_iter().next() else {
            return Err(ApiError::NotFound {
                resource: String::from("Access code"),
                message: String::from("Invalid or expired access code."),
            });
        };
        if user.is_claimed {
            return Err(already_claimed());
        }

        let password_hash: String = credentials.hash_password(password)?;

        let (user_id, activated): (DocumentId, UserRecord) = self.store.run_transaction(|tx| {
            // The pre-transaction lookup can be stale; this one is the
            // commit precondition that keeps the code single-use. A
            // losing concurrent claim retries against the committed
            // state, where the code is already cleared.
            let Some((user_id, mut current)) =
                tx.find_first(collections::USERS, |user: &UserRecord| {
                    user.access_code.as_deref() == Some(access_code)
                })?
            else {
                return Err(ApiError::NotFound {
                    resource: String::from("Access code"),
                    message: String::from("Invalid or expired access code."),
                });
            };
            if current.is_claimed {
                return Err(already_claimed());
            }
            current.password_hash = Some(password_hash.clone());
            current.is_claimed = true;
            current.access_code = None;
            current.activated_at = Some(OffsetDateTime::now_utc());
            tx.put(collections::USERS, &user_id, &current)?;
            Ok((user_id, current))
        })?;

        let principal: Principal = Principal::new(
            user_id.clone(),
            activated.is_admin,
            activated.is_nda_accepted,
        );
        let token: String = credentials.issue_token(&principal)?;

        info!(user_id = %user_id, "account activated");
        Ok(ClaimOutcome { user_id, token })
    }

    /// Moves a referral through the vetting pipeline.
    ///
    /// The transition into `Approved` creates the reward and flips
    /// `reward_status` to `Issued` in the same transaction, gated on
    /// the current `reward_status` being `Pending`. Re-approving an
    /// already-issued referral rewrites the status idempotently and
    /// reports success without a second reward.
    ///
    /// # Errors
    ///
    /// - `Validation` if `new_status` is not a pipeline status
    /// - `NotFound` if the referral does not exist
    pub fn update_referral_status(
        &self,
        admin_id: &str,
        referral_id: &str,
        new_status: &str,
        reward_type: Option<String>,
    ) -> ApiResult<ReferralStatus> {
        let status: ReferralStatus = ReferralStatus::parse(new_status)?;
        let reward_type: String =
            reward_type.unwrap_or_else(|| String::from(DEFAULT_REWARD_TYPE));

        self.store.run_transaction(|tx| {
            let Some(mut referral) =
                tx.read::<ReferralRecord>(collections::REFERRALS, referral_id)?
            else {
                return Err(ApiError::NotFound {
                    resource: String::from("Referral"),
                    message: String::from("Referral not found."),
                });
            };

            let now: OffsetDateTime = OffsetDateTime::now_utc();
            if status == ReferralStatus::Approved
                && referral.reward_status == RewardStatus::Pending
            {
                let reward: RewardRecord = RewardRecord {
                    referrer_id: referral.referrer_id.clone(),
                    referral_id: referral_id.to_string(),
                    reward_type: reward_type.clone(),
                    status: RewardState::Pending,
                    issued_by: admin_id.to_string(),
                    updated_by: None,
                    created_at: now,
                    updated_at: None,
                };
                tx.create(collections::REWARDS, &reward)?;
                referral.reward_status = RewardStatus::Issued;
            }
            referral.status = status;
            referral.updated_at = now;
            tx.put(collections::REFERRALS, referral_id, &referral)?;
            Ok(())
        })?;

        info!(
            admin_id,
            referral_id,
            status = status.as_str(),
            "referral status updated"
        );
        Ok(status)
    }

    /// Updates a reward's fulfillment state.
    ///
    /// # Errors
    ///
    /// - `Validation` if `new_status` is not a reward state
    /// - `NotFound` if the reward does not exist
    pub fn update_reward_status(
        &self,
        admin_id: &str,
        reward_id: &str,
        new_status: &str,
    ) -> ApiResult<RewardState> {
        let status: RewardState = RewardState::parse(new_status)?;

        self.store.run_transaction(|tx| {
            let Some(mut reward) = tx.read::<RewardRecord>(collections::REWARDS, reward_id)?
            else {
                return Err(ApiError::NotFound {
                    resource: String::from("Reward"),
                    message: String::from("Reward not found."),
                });
            };
            reward.status = status;
            reward.updated_by = Some(admin_id.to_string());
            reward.updated_at = Some(OffsetDateTime::now_utc());
            tx.put(collections::REWARDS, reward_id, &reward)?;
            Ok(())
        })?;

        info!(admin_id, reward_id, status = status.as_str(), "reward status updated");
        Ok(status)
    }

    /// Lists a member's own referrals, newest first.
    ///
    /// # Errors
    ///
    /// Returns a translated store error if the collection cannot be
    /// read.
    pub fn my_referrals(
        &self,
        referrer_id: &str,
    ) -> ApiResult<Vec<(DocumentId, ReferralRecord)>> {
        let mut referrals: Vec<(DocumentId, ReferralRecord)> = self
            .store
            .query(collections::REFERRALS, |referral: &ReferralRecord| {
                referral.referrer_id == referrer_id
            })?;
        referrals.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(referrals)
    }

    /// Lists every referral, newest first. Admin dashboard view.
    ///
    /// # Errors
    ///
    /// Returns a translated store error if the collection cannot be
    /// read.
    pub fn all_referrals(&self) -> ApiResult<Vec<(DocumentId, ReferralRecord)>> {
        let mut referrals: Vec<(DocumentId, ReferralRecord)> = self
            .store
            .query(collections::REFERRALS, |_: &ReferralRecord| true)?;
        referrals.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(referrals)
    }

    /// Lists every reward, newest first. Admin dashboard view.
    ///
    /// # Errors
    ///
    /// Returns a translated store error if the collection cannot be
    /// read.
    pub fn all_rewards(&self) -> ApiResult<Vec<(DocumentId, RewardRecord)>> {
        let mut rewards: Vec<(DocumentId, RewardRecord)> = self
            .store
            .query(collections::REWARDS, |_: &RewardRecord| true)?;
        rewards.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(rewards)
    }
}

fn already_claimed() -> ApiError {
    ApiError::Conflict {
        rule: String::from("code_already_used"),
        message: String::from("Access code has already been used."),
    }
}
