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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod access_code;
pub mod collections;
mod error;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use access_code::{ACCESS_CODE_ALPHABET, ACCESS_CODE_LENGTH, generate_access_code};
pub use error::DomainError;
pub use status::{ConnectionVisibility, ReferralStatus, RewardState, RewardStatus};
pub use types::{
    EventRecord, ReferralRecord, RewardRecord, UserRecord, VillaBookingRecord,
    DEFAULT_REWARD_TYPE,
};
pub use validation::{validate_booking_dates, validate_email, validate_event_capacity};
