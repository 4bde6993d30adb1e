// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::thread;

use time::{Duration, OffsetDateTime};

use atrium_domain::{EventRecord, VillaBookingRecord, collections};
use atrium_store::DocumentId;

use crate::error::ApiError;
use crate::request_response::{
    BookingMemberView, CreateEventRequest, NewVillaBooking, VillaBookingUpdate,
};
use crate::tests::helpers::{TestContext, context, seed_event, seed_member};

fn event_request(title: &str, days_ahead: i64, max_capacity: Option<u32>) -> CreateEventRequest {
    CreateEventRequest {
        title: String::from(title),
        description: None,
        date: OffsetDateTime::now_utc() + Duration::days(days_ahead),
        location: None,
        max_capacity,
    }
}

fn booking_request(member_id: &str, nights: i64) -> NewVillaBooking {
    let check_in: OffsetDateTime = OffsetDateTime::now_utc() + Duration::days(30);
    NewVillaBooking {
        member_id: String::from(member_id),
        villa_name: String::from("Villa Aurelia"),
        check_in,
        check_out: check_in + Duration::days(nights),
        status: None,
        notes: None,
        number_of_guests: Some(2),
        price: Some(1200.0),
        payment_status: None,
        property_type: Some(String::from("Private villa")),
        property_contact_info: Some(String::from("+1 555 0100")),
        property_rules: None,
    }
}

#[test]
fn upcoming_events_excludes_the_past_and_sorts_soonest_first() {
    let ctx: TestContext = context();
    ctx.reservations.create_event(event_request("Later", 14, None)).unwrap();
    ctx.reservations.create_event(event_request("Sooner", 2, None)).unwrap();
    ctx.reservations.create_event(event_request("Past", -3, None)).unwrap();

    let upcoming: Vec<(DocumentId, EventRecord)> = ctx
        .reservations
        .upcoming_events(OffsetDateTime::now_utc())
        .unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|(_, e)| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Sooner", "Later"]);
}

#[test]
fn create_event_rejects_a_blank_title_and_zero_capacity() {
    let ctx: TestContext = context();

    let blank: ApiError = ctx
        .reservations
        .create_event(event_request("   ", 1, None))
        .unwrap_err();
    assert!(matches!(blank, ApiError::Validation { .. }));

    let zero: ApiError = ctx
        .reservations
        .create_event(event_request("Dinner", 1, Some(0)))
        .unwrap_err();
    assert!(matches!(zero, ApiError::Validation { .. }));
}

#[test]
fn rsvp_adds_the_member_once() {
    let ctx: TestContext = context();
    let member: DocumentId = seed_member(&ctx, "M", "m@example.com", "pw", false, true);
    let event_id: DocumentId = seed_event(&ctx, "Dinner", Some(10));

    ctx.reservations.rsvp(&event_id, &member).unwrap();
    let again: ApiError = ctx.reservations.rsvp(&event_id, &member).unwrap_err();
    assert!(matches!(again, ApiError::Conflict { rule, .. } if rule == "already_rsvped"));

    let event: EventRecord = ctx
        .store
        .get(collections::EVENTS, &event_id)
        .unwrap()
        .unwrap();
    assert_eq!(event.attendees, vec![member]);
}

#[test]
fn rsvp_against_a_full_event_conflicts() {
    let ctx: TestContext = context();
    let first: DocumentId = seed_member(&ctx, "A", "a@example.com", "pw", false, true);
    let second: DocumentId = seed_member(&ctx, "B", "b@example.com", "pw", false, true);
    let event_id: DocumentId = seed_event(&ctx, "Tasting", Some(1));

    ctx.reservations.rsvp(&event_id, &first).unwrap();
    let err: ApiError = ctx.reservations.rsvp(&event_id, &second).unwrap_err();
    assert!(matches!(err, ApiError::Conflict { rule, .. } if rule == "event_full"));
}

#[test]
fn racing_for_the_last_seat_admits_exactly_one() {
    let ctx: TestContext = context();
    let event_id: DocumentId = seed_event(&ctx, "Tasting", Some(1));
    let members: Vec<DocumentId> = (0..4)
        .map(|i| {
            seed_member(
                &ctx,
                &format!("M{i}"),
                &format!("m{i}@example.com"),
                "pw",
                false,
                true,
            )
        })
        .collect();

    let successes: usize = thread::scope(|scope| {
        let handles: Vec<_> = members
            .iter()
            .map(|member| {
                let reservations = ctx.reservations.clone();
                let event_id = event_id.clone();
                scope.spawn(move || reservations.rsvp(&event_id, member).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("rsvp thread"))
            .filter(|reserved| *reserved)
            .count()
    });
    assert_eq!(successes, 1);

    let event: EventRecord = ctx
        .store
        .get(collections::EVENTS, &event_id)
        .unwrap()
        .unwrap();
    assert_eq!(event.attendees.len(), 1);
}

#[test]
fn canceling_an_rsvp_frees_the_seat() {
    let ctx: TestContext = context();
    let first: DocumentId = seed_member(&ctx, "A", "a@example.com", "pw", false, true);
    let second: DocumentId = seed_member(&ctx, "B", "b@example.com", "pw", false, true);
    let event_id: DocumentId = seed_event(&ctx, "Tasting", Some(1));

    ctx.reservations.rsvp(&event_id, &first).unwrap();
    ctx.reservations.cancel_rsvp(&event_id, &first).unwrap();
    ctx.reservations.rsvp(&event_id, &second).unwrap();

    let event: EventRecord = ctx
        .store
        .get(collections::EVENTS, &event_id)
        .unwrap()
        .unwrap();
    assert_eq!(event.attendees, vec![second]);
}

#[test]
fn canceling_without_an_rsvp_is_a_validation_error() {
    let ctx: TestContext = context();
    let member: DocumentId = seed_member(&ctx, "M", "m@example.com", "pw", false, true);
    let event_id: DocumentId = seed_event(&ctx, "Dinner", None);

    let err: ApiError = ctx.reservations.cancel_rsvp(&event_id, &member).unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[test]
fn rsvp_on_a_missing_event_is_not_found() {
    let ctx: TestContext = context();
    let err: ApiError = ctx.reservations.rsvp("no-such-event", "m").unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[test]
fn booking_creation_validates_dates_and_required_fields() {
    let ctx: TestContext = context();
    let admin: DocumentId = seed_member(&ctx, "Admin", "admin@example.com", "pw", true, true);

    let mut missing: NewVillaBooking = booking_request("member-1", 3);
    missing.villa_name = String::new();
    let err: ApiError = ctx.reservations.create_booking(&admin, missing).unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));

    let mut inverted: NewVillaBooking = booking_request("member-1", 3);
    inverted.check_out = inverted.check_in;
    let err: ApiError = ctx.reservations.create_booking(&admin, inverted).unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[test]
fn booking_update_applies_partial_fields_and_revalidates_dates() {
    let ctx: TestContext = context();
    let admin: DocumentId = seed_member(&ctx, "Admin", "admin@example.com", "pw", true, true);
    let booking_id: DocumentId = ctx
        .reservations
        .create_booking(&admin, booking_request("member-1", 3))
        .unwrap();

    ctx.reservations
        .update_booking(
            &booking_id,
            VillaBookingUpdate {
                status: Some(String::from("Cancelled")),
                price: Some(900.0),
                ..VillaBookingUpdate::default()
            },
        )
        .unwrap();

    let booking: VillaBookingRecord = ctx.reservations.booking(&booking_id).unwrap();
    assert_eq!(booking.status, "Cancelled");
    assert_eq!(booking.price, Some(900.0));
    assert_eq!(booking.villa_name, "Villa Aurelia");

    let bad_dates: ApiError = ctx
        .reservations
        .update_booking(
            &booking_id,
            VillaBookingUpdate {
                check_out: Some(booking.check_in),
                ..VillaBookingUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(bad_dates, ApiError::Validation { .. }));
}

#[test]
fn deleting_a_booking_twice_reports_not_found() {
    let ctx: TestContext = context();
    let admin: DocumentId = seed_member(&ctx, "Admin", "admin@example.com", "pw", true, true);
    let booking_id: DocumentId = ctx
        .reservations
        .create_booking(&admin, booking_request("member-1", 3))
        .unwrap();

    ctx.reservations.delete_booking(&booking_id).unwrap();
    let err: ApiError = ctx.reservations.delete_booking(&booking_id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[test]
fn my_bookings_filters_by_member() {
    let ctx: TestContext = context();
    let admin: DocumentId = seed_member(&ctx, "Admin", "admin@example.com", "pw", true, true);
    ctx.reservations
        .create_booking(&admin, booking_request("member-1", 3))
        .unwrap();
    ctx.reservations
        .create_booking(&admin, booking_request("member-2", 5))
        .unwrap();

    let mine: Vec<(DocumentId, VillaBookingRecord)> =
        ctx.reservations.my_bookings("member-1").unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].1.member_id, "member-1");
    assert_eq!(ctx.reservations.all_bookings().unwrap().len(), 2);
}

#[test]
fn member_view_omits_price_contact_info_and_creator() {
    let ctx: TestContext = context();
    let admin: DocumentId = seed_member(&ctx, "Admin", "admin@example.com", "pw", true, true);
    let booking_id: DocumentId = ctx
        .reservations
        .create_booking(&admin, booking_request("member-1", 3))
        .unwrap();
    let booking: VillaBookingRecord = ctx.reservations.booking(&booking_id).unwrap();

    let view: BookingMemberView = BookingMemberView::from_record(booking_id, booking);
    let json: serde_json::Value = serde_json::to_value(&view).unwrap();

    assert!(json.get("price").is_none());
    assert!(json.get("property_contact_info").is_none());
    assert!(json.get("created_by").is_none());
    assert_eq!(json["villa_name"], "Villa Aurelia");
}
