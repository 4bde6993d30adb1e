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

//! Operation layer: credential service, access-control guards, and the
//! referral, reservation, and account engines.
//!
//! Engines take the shared store handle at construction and translate
//! every failure into the [`ApiError`] taxonomy at this boundary; store
//! and credential internals never reach the transport layer.

mod account;
mod credentials;
mod error;
mod guard;
mod referral;
mod request_response;
mod reservation;

#[cfg(test)]
mod tests;

pub use account::{AccountEngine, LoginSuccess};
pub use credentials::{Claims, CredentialError, CredentialService, Principal};
pub use error::{ApiError, ApiResult};
pub use guard::{require_admin, require_nda_accepted};
pub use referral::{ClaimOutcome, InviteOutcome, ReferralEngine};
pub use request_response::{
    BookingAdminView, BookingMemberView, ClaimCodeRequest, CreateEventRequest, EventView,
    InviteRequest, LoginRequest, NewVillaBooking, ReferralView, RewardView,
    UpdateReferralStatusRequest, UpdateRewardStatusRequest, UserView, VillaBookingUpdate,
};
pub use reservation::ReservationEngine;
