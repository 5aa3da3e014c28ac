use chrono::NaiveDate;

use crate::errors::{AppError, BookingError};
use crate::models::{
    Booking, BookingFields, BookingLookup, CreateBooking, Intent, ModifyBooking, WebhookResponse,
    DEFAULT_PAYMENT_STATUS,
};
use crate::services::dates::{format_date, StayDates};
use crate::store::BookingStore;

pub const CANCELLED_MESSAGE: &str = "Booking successfully cancelled.";
pub const UPDATED_MESSAGE: &str = "Booking updated successfully.";
pub const UNKNOWN_ACTION_MESSAGE: &str = "Unknown action.";

/// Runs one intent against the store. Business rejections come back as
/// message-only responses; only storage failures are errors.
pub fn dispatch(
    store: &mut dyn BookingStore,
    intent: Intent,
    today: NaiveDate,
) -> Result<WebhookResponse, AppError> {
    match intent {
        Intent::View(lookup) => Ok(view_booking(store, &lookup)),
        Intent::Cancel(lookup) => cancel_booking(store, &lookup),
        Intent::Modify(modify) => modify_booking(store, &modify, today),
        Intent::Create(create) => create_booking(store, &create, today),
        Intent::Unknown(name) => {
            tracing::info!(intent = ?name, "unknown intent");
            Ok(WebhookResponse::message(UNKNOWN_ACTION_MESSAGE))
        }
    }
}

fn rejected(err: BookingError) -> WebhookResponse {
    tracing::info!(reason = %err, "request rejected");
    WebhookResponse::message(err.to_string())
}

fn view_booking(store: &dyn BookingStore, lookup: &BookingLookup) -> WebhookResponse {
    match store.find(lookup.booking_id, Some(lookup.email.as_str())) {
        Some(booking) => WebhookResponse::booking(booking.clone()),
        None => rejected(BookingError::NoBookingFound),
    }
}

fn cancel_booking(
    store: &mut dyn BookingStore,
    lookup: &BookingLookup,
) -> Result<WebhookResponse, AppError> {
    if store.find(lookup.booking_id, Some(lookup.email.as_str())).is_none() {
        return Ok(rejected(BookingError::NotFound));
    }

    store.remove(lookup.booking_id)?;
    tracing::info!(booking_id = lookup.booking_id, "booking cancelled");
    Ok(WebhookResponse::message(CANCELLED_MESSAGE))
}

fn modify_booking(
    store: &mut dyn BookingStore,
    modify: &ModifyBooking,
    today: NaiveDate,
) -> Result<WebhookResponse, AppError> {
    let Some(existing) = store
        .find(modify.lookup.booking_id, Some(modify.lookup.email.as_str()))
        .cloned()
    else {
        return Ok(rejected(BookingError::NotFound));
    };

    let updated = match apply_changes(&existing, &modify.fields, today) {
        Ok(b) => b,
        Err(e) => return Ok(rejected(e)),
    };

    store.update(updated.clone())?;
    tracing::info!(booking_id = updated.booking_id, "booking modified");
    Ok(WebhookResponse::booking_with_message(updated, UPDATED_MESSAGE))
}

/// Validates the effective stay dates and returns the booking with every
/// supplied field applied. `email` and `booking_id` are never changed.
pub fn apply_changes(
    existing: &Booking,
    fields: &BookingFields,
    today: NaiveDate,
) -> Result<Booking, BookingError> {
    let check_in = fields.check_in.as_deref().unwrap_or(&existing.check_in);
    let check_out = fields.check_out.as_deref().unwrap_or(&existing.check_out);
    StayDates::parse(check_in, check_out)?.validate_for_modify(today)?;

    let num_guests = match &fields.num_guests {
        Some(count) => count.resolve()?,
        None => existing.num_guests,
    };

    let mut updated = existing.clone();
    overwrite(&mut updated.guest_name, &fields.guest_name);
    overwrite(&mut updated.phone, &fields.phone);
    overwrite(&mut updated.hotel_branch, &fields.hotel_branch);
    overwrite(&mut updated.room_type, &fields.room_type);
    overwrite(&mut updated.check_in, &fields.check_in);
    overwrite(&mut updated.check_out, &fields.check_out);
    overwrite(&mut updated.payment_status, &fields.payment_status);
    updated.num_guests = num_guests;
    updated.modified_on = format_date(today);

    Ok(updated)
}

fn overwrite(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}

fn create_booking(
    store: &mut dyn BookingStore,
    create: &CreateBooking,
    today: NaiveDate,
) -> Result<WebhookResponse, AppError> {
    let booking = match new_booking(create, store.next_id()?, today) {
        Ok(b) => b,
        Err(e) => return Ok(rejected(e)),
    };

    store.insert(booking.clone())?;
    tracing::info!(booking_id = booking.booking_id, "booking created");
    Ok(WebhookResponse::booking(booking))
}

/// Builds a new booking from caller input. Dates are only checked when both
/// are supplied.
pub fn new_booking(
    create: &CreateBooking,
    booking_id: i64,
    today: NaiveDate,
) -> Result<Booking, BookingError> {
    let fields = &create.fields;
    let check_in = fields.check_in.clone().unwrap_or_default();
    let check_out = fields.check_out.clone().unwrap_or_default();

    if !check_in.is_empty() && !check_out.is_empty() {
        StayDates::parse(&check_in, &check_out)?.validate_for_create(today)?;
    }

    let num_guests = match &fields.num_guests {
        Some(count) => count.resolve()?,
        None => 1,
    };

    Ok(Booking {
        booking_id,
        created_on: format_date(today),
        modified_on: String::new(),
        guest_name: fields.guest_name.clone().unwrap_or_default(),
        email: create.email.clone().unwrap_or_default(),
        phone: fields.phone.clone().unwrap_or_default(),
        hotel_branch: fields.hotel_branch.clone().unwrap_or_default(),
        room_type: fields.room_type.clone().unwrap_or_default(),
        check_in,
        check_out,
        num_guests,
        payment_status: fields
            .payment_status
            .clone()
            .unwrap_or_else(|| DEFAULT_PAYMENT_STATUS.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GuestCount;

    /// Memory-only store; persistence is covered by the CSV store tests.
    #[derive(Default)]
    struct MemoryStore {
        bookings: Vec<Booking>,
        fail_writes: bool,
    }

    impl MemoryStore {
        fn check(&self) -> Result<(), AppError> {
            if self.fail_writes {
                return Err(AppError::Storage("disk full".to_string()));
            }
            Ok(())
        }
    }

    impl BookingStore for MemoryStore {
        fn all(&self) -> &[Booking] {
            &self.bookings
        }

        fn insert(&mut self, booking: Booking) -> Result<(), AppError> {
            self.check()?;
            self.bookings.push(booking);
            Ok(())
        }

        fn update(&mut self, booking: Booking) -> Result<bool, AppError> {
            self.check()?;
            match self.bookings.iter_mut().find(|b| b.booking_id == booking.booking_id) {
                Some(slot) => {
                    *slot = booking;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn remove(&mut self, booking_id: i64) -> Result<Option<Booking>, AppError> {
            self.check()?;
            let idx = self.bookings.iter().position(|b| b.booking_id == booking_id);
            Ok(idx.map(|i| self.bookings.remove(i)))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn stored(id: i64) -> Booking {
        Booking {
            booking_id: id,
            created_on: "2026-10-01".to_string(),
            modified_on: String::new(),
            guest_name: "Grace Hopper".to_string(),
            email: "A@B.com".to_string(),
            phone: "555-0100".to_string(),
            hotel_branch: "Harbour".to_string(),
            room_type: "Double".to_string(),
            check_in: "2026-11-01".to_string(),
            check_out: "2026-11-04".to_string(),
            num_guests: 2,
            payment_status: "Unpaid".to_string(),
        }
    }

    fn lookup(id: i64, email: &str) -> BookingLookup {
        BookingLookup {
            booking_id: id,
            email: email.to_string(),
        }
    }

    fn create(check_in: &str, check_out: &str) -> CreateBooking {
        CreateBooking {
            email: Some("new@guest.com".to_string()),
            fields: BookingFields {
                guest_name: Some("New Guest".to_string()),
                check_in: Some(check_in.to_string()),
                check_out: Some(check_out.to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_view_case_insensitive_email() {
        let mut store = MemoryStore {
            bookings: vec![stored(1001)],
            ..Default::default()
        };
        let res = dispatch(&mut store, Intent::View(lookup(1001, "a@b.com")), today()).unwrap();
        assert_eq!(res, WebhookResponse::booking(stored(1001)));
    }

    #[test]
    fn test_view_miss() {
        let mut store = MemoryStore::default();
        let res = dispatch(&mut store, Intent::View(lookup(1001, "a@b.com")), today()).unwrap();
        assert_eq!(res.message_text(), Some("No booking found."));
        assert!(res.session.is_none());
    }

    #[test]
    fn test_cancel_removes_booking() {
        let mut store = MemoryStore {
            bookings: vec![stored(1001), stored(1002)],
            ..Default::default()
        };
        let res = dispatch(&mut store, Intent::Cancel(lookup(1001, "a@b.com")), today()).unwrap();
        assert_eq!(res.message_text(), Some(CANCELLED_MESSAGE));
        assert_eq!(store.bookings, vec![stored(1002)]);
    }

    #[test]
    fn test_cancel_miss_leaves_store_unchanged() {
        let mut store = MemoryStore {
            bookings: vec![stored(1001)],
            ..Default::default()
        };
        let res =
            dispatch(&mut store, Intent::Cancel(lookup(1001, "wrong@b.com")), today()).unwrap();
        assert_eq!(res.message_text(), Some("Booking not found."));
        assert_eq!(store.bookings, vec![stored(1001)]);
    }

    #[test]
    fn test_modify_applies_only_sent_fields() {
        let mut store = MemoryStore {
            bookings: vec![stored(1001)],
            ..Default::default()
        };
        let modify = ModifyBooking {
            lookup: lookup(1001, "a@b.com"),
            fields: BookingFields {
                room_type: Some("Suite".to_string()),
                num_guests: Some(GuestCount::Valid(3)),
                check_out: Some("2026-11-06".to_string()),
                ..Default::default()
            },
        };

        let res = dispatch(&mut store, Intent::Modify(modify), today()).unwrap();
        assert_eq!(res.message_text(), Some(UPDATED_MESSAGE));

        let updated = &store.bookings[0];
        assert_eq!(updated.room_type, "Suite");
        assert_eq!(updated.num_guests, 3);
        assert_eq!(updated.check_out, "2026-11-06");
        assert_eq!(updated.check_in, "2026-11-01");
        assert_eq!(updated.guest_name, "Grace Hopper");
        assert_eq!(updated.email, "A@B.com");
        assert_eq!(updated.created_on, "2026-10-01");
        assert_eq!(updated.modified_on, "2026-10-19");
        assert_eq!(res.session.map(|s| s.params), Some(updated.clone()));
    }

    #[test]
    fn test_modify_stamps_modified_on_with_no_changes() {
        let existing = stored(1001);
        let updated = apply_changes(&existing, &BookingFields::default(), today()).unwrap();
        assert_eq!(updated.modified_on, "2026-10-19");
        assert_eq!(
            Booking {
                modified_on: String::new(),
                ..updated
            },
            existing
        );
    }

    #[test]
    fn test_modify_rejections_do_not_mutate() {
        let cases = [
            (
                BookingFields {
                    check_out: Some("2026-10-30".to_string()),
                    ..Default::default()
                },
                "Check-out date must be after the check-in date.",
            ),
            (
                BookingFields {
                    check_in: Some("2026-10-19".to_string()),
                    ..Default::default()
                },
                "Check-in date must be after today's date.",
            ),
            (
                BookingFields {
                    check_in: Some("next week".to_string()),
                    room_type: Some("Suite".to_string()),
                    ..Default::default()
                },
                "Invalid date format. Please use YYYY-MM-DD.",
            ),
            (
                BookingFields {
                    num_guests: Some(GuestCount::Invalid("lots".to_string())),
                    ..Default::default()
                },
                "Number of guests must be a whole number.",
            ),
        ];

        for (fields, message) in cases {
            let mut store = MemoryStore {
                bookings: vec![stored(1001)],
                ..Default::default()
            };
            let modify = ModifyBooking {
                lookup: lookup(1001, "a@b.com"),
                fields,
            };
            let res = dispatch(&mut store, Intent::Modify(modify), today()).unwrap();
            assert_eq!(res.message_text(), Some(message));
            assert!(res.session.is_none());
            assert_eq!(store.bookings, vec![stored(1001)]);
        }
    }

    #[test]
    fn test_modify_miss_checked_before_dates() {
        let mut store = MemoryStore::default();
        let modify = ModifyBooking {
            lookup: lookup(1001, "a@b.com"),
            fields: BookingFields {
                check_in: Some("garbage".to_string()),
                ..Default::default()
            },
        };
        let res = dispatch(&mut store, Intent::Modify(modify), today()).unwrap();
        assert_eq!(res.message_text(), Some("Booking not found."));
    }

    #[test]
    fn test_create_on_empty_store() {
        let mut store = MemoryStore::default();
        let res = dispatch(
            &mut store,
            Intent::Create(create("2999-01-01", "2999-01-05")),
            today(),
        )
        .unwrap();

        let booking = res.session.expect("session params").params;
        assert_eq!(booking.booking_id, 1001);
        assert_eq!(booking.created_on, "2026-10-19");
        assert_eq!(booking.modified_on, "");
        assert_eq!(booking.num_guests, 1);
        assert_eq!(booking.payment_status, "Unpaid");
        assert_eq!(booking.email, "new@guest.com");
        assert_eq!(booking.phone, "");
        assert_eq!(store.bookings, vec![booking]);
    }

    #[test]
    fn test_create_ids_strictly_increase() {
        let mut store = MemoryStore {
            bookings: vec![stored(1010)],
            ..Default::default()
        };
        let mut ids = vec![];
        for _ in 0..3 {
            let res = dispatch(
                &mut store,
                Intent::Create(create("2999-01-01", "2999-01-05")),
                today(),
            )
            .unwrap();
            ids.push(res.session.unwrap().params.booking_id);
        }
        assert_eq!(ids, vec![1011, 1012, 1013]);
    }

    #[test]
    fn test_create_past_date_rejected() {
        let mut store = MemoryStore::default();
        let res = dispatch(
            &mut store,
            Intent::Create(create("2000-01-01", "2999-01-05")),
            today(),
        )
        .unwrap();
        assert_eq!(
            res.message_text(),
            Some("Check-in and check-out dates must be after today's date.")
        );
        assert!(store.bookings.is_empty());
    }

    #[test]
    fn test_create_bad_format_rejected() {
        let mut store = MemoryStore::default();
        let res = dispatch(
            &mut store,
            Intent::Create(create("01/01/2999", "2999-01-05")),
            today(),
        )
        .unwrap();
        assert_eq!(
            res.message_text(),
            Some("Invalid date format. Please use YYYY-MM-DD.")
        );
        assert!(store.bookings.is_empty());
    }

    #[test]
    fn test_create_skips_date_checks_without_both_dates() {
        let booking = new_booking(&create("2000-01-01", ""), 1001, today()).unwrap();
        assert_eq!(booking.check_in, "2000-01-01");
        assert_eq!(booking.check_out, "");

        let booking = new_booking(&CreateBooking::default(), 1001, today()).unwrap();
        assert_eq!(booking.check_in, "");
        assert_eq!(booking.guest_name, "");
    }

    #[test]
    fn test_storage_failure_propagates() {
        let mut store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let res = dispatch(
            &mut store,
            Intent::Create(create("2999-01-01", "2999-01-05")),
            today(),
        );
        assert!(matches!(res, Err(AppError::Storage(_))));
    }

    #[test]
    fn test_padded_dates_rejected_not_stored() {
        let existing = stored(1001);
        let fields = BookingFields {
            check_in: Some(" 2026-11-02 ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            apply_changes(&existing, &fields, today()),
            Err(BookingError::InvalidDateFormat)
        );

        assert_eq!(
            new_booking(&create("2999-01-01", " 2999-01-05"), 1001, today()),
            Err(BookingError::InvalidDateFormat)
        );
    }

    #[test]
    fn test_create_with_exhausted_ids() {
        let mut store = MemoryStore {
            bookings: vec![stored(i64::MAX)],
            ..Default::default()
        };
        let res = dispatch(
            &mut store,
            Intent::Create(create("2999-01-01", "2999-01-05")),
            today(),
        );
        assert!(matches!(res, Err(AppError::Storage(_))));
        assert_eq!(store.bookings, vec![stored(i64::MAX)]);
    }

    #[test]
    fn test_unknown_intent() {
        let mut store = MemoryStore::default();
        let res = dispatch(&mut store, Intent::Unknown(Some("spa".to_string())), today()).unwrap();
        assert_eq!(res.message_text(), Some(UNKNOWN_ACTION_MESSAGE));
    }
}
