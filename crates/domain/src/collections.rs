// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collection names shared by every component that touches the store.
//!
//! Each collection has exactly one writing component (see the engine
//! modules); these constants exist so that readers and writers agree
//! on the name without stringly-typed call sites.

/// Member accounts, including invited-but-unclaimed users.
pub const USERS: &str = "users";

/// Referral records owned by the referral engine.
pub const REFERRALS: &str = "referrals";

/// Reward records, created only on the Approved transition.
pub const REWARDS: &str = "rewards";

/// Club events with their attendee lists.
pub const EVENTS: &str = "events";

/// Villa bookings managed by admins on behalf of members.
pub const VILLA_BOOKINGS: &str = "villaBookings";

/// Best-effort login attempt log.
pub const LOGIN_LOGS: &str = "loginLogs";

/// Best-effort admin action log.
pub const ADMIN_ACTIONS: &str = "adminActions";
