// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request bodies and response views for the HTTP surface.
//!
//! Views pair a document id with its record. The member-facing booking
//! view is a separate hand-written struct rather than a filtered admin
//! view, so a record field added later is hidden from members by
//! default instead of leaking.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use atrium_domain::{EventRecord, ReferralRecord, RewardRecord, UserRecord, VillaBookingRecord};
use atrium_store::DocumentId;

// --- Request bodies ---

/// Body of `POST /api/auth/claim-code`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimCodeRequest {
    /// The single-use activation code from the invite.
    #[serde(default)]
    pub access_code: String,
    /// The password to set on the activated account.
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /api/referrals/invite`.
#[derive(Debug, Clone, Deserialize)]
pub struct InviteRequest {
    #[serde(default)]
    pub referred_name: String,
    #[serde(default)]
    pub referred_email: String,
}

/// Body of `PUT /api/referrals/admin/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReferralStatusRequest {
    /// Target pipeline status, by display name.
    #[serde(default)]
    pub status: String,
    /// Reward kind to issue on approval; defaults when absent.
    #[serde(default)]
    pub reward_type: Option<String>,
}

/// Body of `PUT /api/referrals/admin/rewards/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRewardStatusRequest {
    /// Target fulfillment state, by display name.
    #[serde(default)]
    pub status: String,
}

/// Body of `POST /api/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub location: Option<String>,
    /// Maximum number of attendees; omit for unbounded.
    #[serde(default)]
    pub max_capacity: Option<u32>,
}

/// Body of `POST /api/villas/admin`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVillaBooking {
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub villa_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub check_in: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub check_out: OffsetDateTime,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub number_of_guests: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub property_contact_info: Option<String>,
    #[serde(default)]
    pub property_rules: Option<String>,
}

/// Body of `PUT /api/villas/admin/{id}`. Absent fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VillaBookingUpdate {
    #[serde(default)]
    pub villa_name: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub check_in: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub check_out: Option<OffsetDateTime>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub number_of_guests: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

// --- Response views ---

/// A user document with its id. Callers must sanitize the record
/// before wrapping it.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: DocumentId,
    #[serde(flatten)]
    pub user: UserRecord,
}

/// A referral document with its id.
#[derive(Debug, Clone, Serialize)]
pub struct ReferralView {
    pub id: DocumentId,
    #[serde(flatten)]
    pub referral: ReferralRecord,
}

/// A reward document with its id.
#[derive(Debug, Clone, Serialize)]
pub struct RewardView {
    pub id: DocumentId,
    #[serde(flatten)]
    pub reward: RewardRecord,
}

/// An event document with its id.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: DocumentId,
    #[serde(flatten)]
    pub event: EventRecord,
}

/// The full booking document with its id. Admin-only.
#[derive(Debug, Clone, Serialize)]
pub struct BookingAdminView {
    pub id: DocumentId,
    #[serde(flatten)]
    pub booking: VillaBookingRecord,
}

/// The member-facing booking view. Omits `price`,
/// `property_contact_info`, and `created_by`.
#[derive(Debug, Clone, Serialize)]
pub struct BookingMemberView {
    pub id: DocumentId,
    pub member_id: String,
    pub villa_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub check_in: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub check_out: OffsetDateTime,
    pub status: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_guests: Option<u32>,
    pub payment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    pub property_rules: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl BookingMemberView {
    /// Builds the member view from the stored record.
    #[must_use]
    pub fn from_record(id: DocumentId, booking: VillaBookingRecord) -> Self {
        Self {
            id,
            member_id: booking.member_id,
            villa_name: booking.villa_name,
            check_in: booking.check_in,
            check_out: booking.check_out,
            status: booking.status,
            notes: booking.notes,
            number_of_guests: booking.number_of_guests,
            payment_status: booking.payment_status,
            property_type: booking.property_type,
            property_rules: booking.property_rules,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
