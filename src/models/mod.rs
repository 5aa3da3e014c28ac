pub mod booking;
pub mod intent;
pub mod webhook;

pub use booking::{Booking, CSV_COLUMNS, DEFAULT_PAYMENT_STATUS};
pub use intent::{BookingFields, BookingLookup, CreateBooking, GuestCount, Intent, ModifyBooking};
pub use webhook::{WebhookRequest, WebhookResponse};
