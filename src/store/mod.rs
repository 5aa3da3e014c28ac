pub mod csv;

pub use self::csv::CsvBookingStore;

use crate::errors::AppError;
use crate::models::Booking;

/// First id handed out by an empty store.
pub const FIRST_BOOKING_ID: i64 = 1001;

/// In-memory booking collection with write-through persistence.
///
/// Reads are served from memory. Every mutating call persists the whole
/// collection before returning; if persisting fails the in-memory state is
/// left as it was.
pub trait BookingStore: Send {
    fn all(&self) -> &[Booking];

    fn insert(&mut self, booking: Booking) -> Result<(), AppError>;

    /// Replaces the stored booking with the same id. Returns `false` if no
    /// such booking exists.
    fn update(&mut self, booking: Booking) -> Result<bool, AppError>;

    fn remove(&mut self, booking_id: i64) -> Result<Option<Booking>, AppError>;

    fn find(&self, booking_id: i64, email: Option<&str>) -> Option<&Booking> {
        find_booking(self.all(), booking_id, email)
    }

    fn next_id(&self) -> Result<i64, AppError> {
        next_booking_id(self.all())
    }
}

/// Linear scan for a booking id, optionally requiring a case-insensitive
/// email match.
pub fn find_booking<'a>(
    bookings: &'a [Booking],
    booking_id: i64,
    email: Option<&str>,
) -> Option<&'a Booking> {
    bookings
        .iter()
        .find(|b| b.booking_id == booking_id && email.map_or(true, |e| b.email_matches(e)))
}

/// One past the highest stored id, or [`FIRST_BOOKING_ID`] when empty.
pub fn next_booking_id(bookings: &[Booking]) -> Result<i64, AppError> {
    match bookings.iter().map(|b| b.booking_id).max() {
        None => Ok(FIRST_BOOKING_ID),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| AppError::Storage(format!("no booking id left after {max}"))),
    }
}
