// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity-bounded reservation engine: event RSVPs and villa bookings.
//!
//! Sole writer of `attendees`. The RSVP path runs its existence,
//! duplicate, and capacity checks inside the same transaction as the
//! mutation, so two concurrent requests for the last seat cannot both
//! pass the capacity check — the store retries the loser against the
//! committed attendee list and it fails the re-run check instead.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::info;

use atrium_domain::{
    EventRecord, VillaBookingRecord, collections, validate_booking_dates, validate_event_capacity,
};
use atrium_store::{DocumentId, MemoryStore};

use crate::error::{ApiError, ApiResult};
use crate::request_response::{CreateEventRequest, NewVillaBooking, VillaBookingUpdate};

/// The reservation engine.
#[derive(Debug, Clone)]
pub struct ReservationEngine {
    store: Arc<MemoryStore>,
}

impl ReservationEngine {
    /// Creates the engine over the shared store handle.
    #[must_use]
    pub const fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    // --- Events ---

    /// Lists events taking place at or after `now`, soonest first.
    ///
    /// # Errors
    ///
    /// Returns a translated store error if the collection cannot be
    /// read.
    pub fn upcoming_events(
        &self,
        now: OffsetDateTime,
    ) -> ApiResult<Vec<(DocumentId, EventRecord)>> {
        let mut events: Vec<(DocumentId, EventRecord)> = self
            .store
            .query(collections::EVENTS, |event: &EventRecord| event.date >= now)?;
        events.sort_by(|a, b| a.1.date.cmp(&b.1.date));
        Ok(events)
    }

    /// Creates an event.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty title or a zero capacity.
    pub fn create_event(&self, request: CreateEventRequest) -> ApiResult<DocumentId> {
        if request.title.trim().is_empty() {
            return Err(ApiError::Validation {
                field: String::from("title"),
                message: String::from("An event title is required."),
            });
        }
        validate_event_capacity(request.max_capacity)?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let event: EventRecord = EventRecord {
            title: request.title,
            description: request.description.unwrap_or_default(),
            date: request.date,
            location: request.location.unwrap_or_default(),
            max_capacity: request.max_capacity,
            attendees: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let event_id: DocumentId = self.store.add(collections::EVENTS, &event)?;
        info!(event_id = %event_id, "event created");
        Ok(event_id)
    }

    /// RSVPs a member to an event.
    ///
    /// Existence, duplicate, and capacity checks and the attendee
    /// mutation form one atomic unit; `|attendees| <= max_capacity`
    /// holds after any interleaving of concurrent calls.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the event does not exist
    /// - `Conflict` (`already_rsvped`) if the member already RSVPd
    /// - `Conflict` (`event_full`) if the event is at capacity
    pub fn rsvp(&self, event_id: &str, user_id: &str) -> ApiResult<()> {
        self.store.run_transaction(|tx| {
            let Some(mut event) = tx.read::<EventRecord>(collections::EVENTS, event_id)? else {
                return Err(event_not_found());
            };
            if event.attendees.iter().any(|attendee| attendee == user_id) {
                return Err(ApiError::Conflict {
                    rule: String::from("already_rsvped"),
                    message: String::from("You have already RSVPd for this event."),
                });
            }
            if let Some(max_capacity) = event.max_capacity {
                if event.attendees.len() >= max_capacity as usize {
                    return Err(ApiError::Conflict {
                        rule: String::from("event_full"),
                        message: String::from("This event is currently full."),
                    });
                }
            }
            event.attendees.push(user_id.to_string());
            event.updated_at = OffsetDateTime::now_utc();
            tx.put(collections::EVENTS, event_id, &event)?;
            Ok(())
        })?;

        info!(event_id, user_id, "RSVP recorded");
        Ok(())
    }

    /// Cancels a member's RSVP.
    ///
    /// Removal cannot overshoot any bound, but the mutation is still
    /// transactional so concurrent RSVPs are not clobbered.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the event does not exist
    /// - `Validation` if the member is not RSVPd
    pub fn cancel_rsvp(&self, event_id: &str, user_id: &str) -> ApiResult<()> {
        self.store.run_transaction(|tx| {
            let Some(mut event) = tx.read::<EventRecord>(collections::EVENTS, event_id)? else {
                return Err(event_not_found());
            };
            let before: usize = event.attendees.len();
            event.attendees.retain(|attendee| attendee != user_id);
            if event.attendees.len() == before {
                return Err(ApiError::Validation {
                    field: String::from("rsvp"),
                    message: String::from("You are not RSVPd for this event."),
                });
            }
            event.updated_at = OffsetDateTime::now_utc();
            tx.put(collections::EVENTS, event_id, &event)?;
            Ok(())
        })?;

        info!(event_id, user_id, "RSVP canceled");
        Ok(())
    }

    // --- Villa bookings ---

    /// Creates a booking on behalf of a member.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for missing required fields or when
    /// `check_in` is not strictly before `check_out`.
    pub fn create_booking(
        &self,
        created_by: &str,
        request: NewVillaBooking,
    ) -> ApiResult<DocumentId> {
        if request.member_id.trim().is_empty() || request.villa_name.trim().is_empty() {
            return Err(ApiError::Validation {
                field: String::from("member_id"),
                message: String::from(
                    "Missing required fields: member_id, villa_name, check_in, check_out.",
                ),
            });
        }
        validate_booking_dates(request.check_in, request.check_out)?;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let booking: VillaBookingRecord = VillaBookingRecord {
            member_id: request.member_id,
            villa_name: request.villa_name,
            check_in: request.check_in,
            check_out: request.check_out,
            status: request.status.unwrap_or_else(|| String::from("Confirmed")),
            notes: request.notes.unwrap_or_default(),
            number_of_guests: request.number_of_guests,
            price: request.price,
            payment_status: request
                .payment_status
                .unwrap_or_else(|| String::from("Pending")),
            property_type: request.property_type,
            property_contact_info: request.property_contact_info,
            property_rules: request.property_rules.unwrap_or_default(),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };
        let booking_id: DocumentId = self.store.add(collections::VILLA_BOOKINGS, &booking)?;
        info!(booking_id = %booking_id, member_id = %booking.member_id, "booking created");
        Ok(booking_id)
    }

    /// Applies a partial update to a booking.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the booking does not exist
    /// - `Validation` if the resulting dates are not strictly ordered
    pub fn update_booking(
        &self,
        booking_id: &str,
        update: VillaBookingUpdate,
    ) -> ApiResult<()> {
        self.store.run_transaction(|tx| {
            let Some(mut booking) =
                tx.read::<VillaBookingRecord>(collections::VILLA_BOOKINGS, booking_id)?
            else {
                return Err(booking_not_found());
            };

            if let Some(villa_name) = update.villa_name.clone() {
                booking.villa_name = villa_name;
            }
            if let Some(check_in) = update.check_in {
                booking.check_in = check_in;
            }
            if let Some(check_out) = update.check_out {
                booking.check_out = check_out;
            }
            if let Some(status) = update.status.clone() {
                booking.status = status;
            }
            if let Some(notes) = update.notes.clone() {
                booking.notes = notes;
            }
            if let Some(number_of_guests) = update.number_of_guests {
                booking.number_of_guests = Some(number_of_guests);
            }
            if let Some(price) = update.price {
                booking.price = Some(price);
            }
            if let Some(payment_status) = update.payment_status.clone() {
                booking.payment_status = payment_status;
            }
            validate_booking_dates(booking.check_in, booking.check_out)?;

            booking.updated_at = OffsetDateTime::now_utc();
            tx.put(collections::VILLA_BOOKINGS, booking_id, &booking)?;
            Ok(())
        })?;

        info!(booking_id, "booking updated");
        Ok(())
    }

    /// Deletes a booking.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booking does not exist.
    pub fn delete_booking(&self, booking_id: &str) -> ApiResult<()> {
        let existing: Option<VillaBookingRecord> =
            self.store.get(collections::VILLA_BOOKINGS, booking_id)?;
        if existing.is_none() {
            return Err(booking_not_found());
        }
        self.store.delete(collections::VILLA_BOOKINGS, booking_id);
        info!(booking_id, "booking deleted");
        Ok(())
    }

    /// Fetches a single booking.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booking does not exist.
    pub fn booking(&self, booking_id: &str) -> ApiResult<VillaBookingRecord> {
        self.store
            .get(collections::VILLA_BOOKINGS, booking_id)?
            .ok_or_else(booking_not_found)
    }

    /// Lists every booking, latest check-in first. Admin view.
    ///
    /// # Errors
    ///
    /// Returns a translated store error if the collection cannot be
    /// read.
    pub fn all_bookings(&self) -> ApiResult<Vec<(DocumentId, VillaBookingRecord)>> {
        let mut bookings: Vec<(DocumentId, VillaBookingRecord)> = self
            .store
            .query(collections::VILLA_BOOKINGS, |_: &VillaBookingRecord| true)?;
        bookings.sort_by(|a, b| b.1.check_in.cmp(&a.1.check_in));
        Ok(bookings)
    }

    /// Lists a member's own bookings, latest check-in first.
    ///
    /// # Errors
    ///
    /// Returns a translated store error if the collection cannot be
    /// read.
    pub fn my_bookings(
        &self,
        member_id: &str,
    ) -> ApiResult<Vec<(DocumentId, VillaBookingRecord)>> {
        let mut bookings: Vec<(DocumentId, VillaBookingRecord)> = self.store.query(
            collections::VILLA_BOOKINGS,
            |booking: &VillaBookingRecord| booking.member_id == member_id,
        )?;
        bookings.sort_by(|a, b| b.1.check_in.cmp(&a.1.check_in));
        Ok(bookings)
    }
}

fn event_not_found() -> ApiError {
    ApiError::NotFound {
        resource: String::from("Event"),
        message: String::from("Event not found."),
    }
}

fn booking_not_found() -> ApiError {
    ApiError::NotFound {
        resource: String::from("Booking"),
        message: String::from("Booking not found."),
    }
}
