// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persisted record types.
//!
//! These structs are the JSON documents held by the store. Document ids
//! are the collection keys, never a field of the document, so every
//! record is id-free and callers carry `(id, record)` pairs.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::status::{ConnectionVisibility, ReferralStatus, RewardState, RewardStatus};

/// Reward type used when an admin does not specify one explicitly.
pub const DEFAULT_REWARD_TYPE: &str = "Standard Referral Reward";

/// A member account.
///
/// Lifecycle: created in the invited state by the referral engine (has
/// an access code, no password hash), claimed exactly once when the
/// code is redeemed, and soft-deleted rather than removed so referral
/// history stays intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Display name.
    pub name: String,
    /// Email address; unique among non-deleted users.
    pub email: String,
    /// Bcrypt hash; absent until the account is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Single-use activation code; present only pre-activation. Cleared
    /// (the field becomes absent) when the account is claimed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
    /// Whether the access code has been redeemed.
    pub is_claimed: bool,
    /// Whether this member has admin privileges.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether this member has accepted the NDA.
    pub is_nda_accepted: bool,
    /// When the NDA was accepted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub nda_accepted_at: Option<OffsetDateTime>,
    /// Soft-delete flag; soft-deleted users keep their documents.
    #[serde(default)]
    pub is_deleted: bool,
    /// When the account was soft-deleted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
    /// Interests used for the connections directory.
    #[serde(default)]
    pub connection_interests: Vec<String>,
    /// Directory visibility preference.
    #[serde(default)]
    pub connection_visibility: ConnectionVisibility,
    /// Id of the member who referred this user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    /// When the account document was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the access code was redeemed.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub activated_at: Option<OffsetDateTime>,
}

impl UserRecord {
    /// Creates a user in the invited state: carries an access code and
    /// no password hash.
    #[must_use]
    pub fn invited(
        name: String,
        email: String,
        access_code: String,
        referred_by: Option<String>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            name,
            email,
            password_hash: None,
            access_code: Some(access_code),
            is_claimed: false,
            is_admin: false,
            is_nda_accepted: false,
            nda_accepted_at: None,
            is_deleted: false,
            deleted_at: None,
            connection_interests: Vec::new(),
            connection_visibility: ConnectionVisibility::default(),
            referred_by,
            created_at: now,
            activated_at: None,
        }
    }
}

/// A referral moving through the vetting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralRecord {
    /// The member who made the referral.
    pub referrer_id: String,
    /// The invited user's document id.
    pub referred_user_id: String,
    /// The candidate's name as entered by the referrer.
    pub referred_name: String,
    /// The candidate's email as entered by the referrer.
    pub referred_email: String,
    /// Position in the vetting pipeline.
    pub status: ReferralStatus,
    /// Whether the reward for this referral has been issued. Flips to
    /// `Issued` at most once, atomically with reward creation.
    pub reward_status: RewardStatus,
    /// When the referral was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the referral was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A reward created by the Approved transition of a referral.
///
/// 1:1 with its triggering referral; never created anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRecord {
    /// The member who earns the reward.
    pub referrer_id: String,
    /// The referral that triggered this reward.
    pub referral_id: String,
    /// Kind of reward.
    pub reward_type: String,
    /// Fulfillment state.
    pub status: RewardState,
    /// Admin who approved the referral.
    pub issued_by: String,
    /// Admin who last updated the reward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// When the reward was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the reward was last updated.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// A club event members can RSVP to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// When the event takes place.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Where the event takes place.
    #[serde(default)]
    pub location: String,
    /// Maximum number of attendees; `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
    /// Attending member ids; each id appears at most once, and the
    /// length never exceeds `max_capacity` when it is set.
    #[serde(default)]
    pub attendees: Vec<String>,
    /// When the event document was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the event document was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A villa booking made by an admin on behalf of a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillaBookingRecord {
    /// The member the booking is for.
    pub member_id: String,
    /// The booked villa.
    pub villa_name: String,
    /// Check-in date; strictly before `check_out`.
    #[serde(with = "time::serde::rfc3339")]
    pub check_in: OffsetDateTime,
    /// Check-out date.
    #[serde(with = "time::serde::rfc3339")]
    pub check_out: OffsetDateTime,
    /// Booking status, e.g. "Confirmed".
    pub status: String,
    /// Internal notes.
    #[serde(default)]
    pub notes: String,
    /// Number of guests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_guests: Option<u32>,
    /// Price; admin-only on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Payment status, e.g. "Pending".
    pub payment_status: String,
    /// Property type, e.g. "Private villa".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Property contact details; admin-only on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_contact_info: Option<String>,
    /// House rules text.
    #[serde(default)]
    pub property_rules: String,
    /// Admin who created the booking; admin-only on the wire.
    pub created_by: String,
    /// When the booking was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the booking was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
