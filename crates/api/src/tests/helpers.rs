// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for api-crate tests.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use atrium_audit::AuditRecorder;
use atrium_domain::{EventRecord, UserRecord, collections};
use atrium_store::{DocumentId, MemoryStore};

use crate::account::AccountEngine;
use crate::credentials::CredentialService;
use crate::referral::ReferralEngine;
use crate::reservation::ReservationEngine;

/// A fully wired set of engines over one fresh store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub credentials: CredentialService,
    pub accounts: AccountEngine,
    pub referrals: ReferralEngine,
    pub reservations: ReservationEngine,
    pub audit: AuditRecorder,
}

/// Builds a context with the low bcrypt cost so tests stay fast.
pub fn context() -> TestContext {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let credentials: CredentialService =
        CredentialService::with_hash_cost("test-secret", Duration::hours(1), 4);
    let audit: AuditRecorder = AuditRecorder::new(Arc::clone(&store));
    TestContext {
        accounts: AccountEngine::new(Arc::clone(&store), audit.clone()),
        referrals: ReferralEngine::new(Arc::clone(&store)),
        reservations: ReservationEngine::new(Arc::clone(&store)),
        audit,
        credentials,
        store,
    }
}

/// Seeds an activated member with the given password and flags.
pub fn seed_member(
    ctx: &TestContext,
    name: &str,
    email: &str,
    password: &str,
    is_admin: bool,
    is_nda_accepted: bool,
) -> DocumentId {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let user: UserRecord = UserRecord {
        name: String::from(name),
        email: String::from(email),
        password_hash: Some(
            ctx.credentials
                .hash_password(password)
                .expect("hashing the seed password"),
        ),
        access_code: None,
        is_claimed: true,
        is_admin,
        is_nda_accepted,
        nda_accepted_at: is_nda_accepted.then_some(now),
        is_deleted: false,
        deleted_at: None,
        connection_interests: Vec::new(),
        connection_visibility: atrium_domain::ConnectionVisibility::default(),
        referred_by: None,
        created_at: now,
        activated_at: Some(now),
    };
    ctx.store
        .add(collections::USERS, &user)
        .expect("seeding a member")
}

/// Seeds an event one week out with the given capacity.
pub fn seed_event(ctx: &TestContext, title: &str, max_capacity: Option<u32>) -> DocumentId {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let event: EventRecord = EventRecord {
        title: String::from(title),
        description: String::new(),
        date: now + Duration::days(7),
        location: String::from("The atrium"),
        max_capacity,
        attendees: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    ctx.store
        .add(collections::EVENTS, &event)
        .expect("seeding an event")
}
