pub mod bookings;
pub mod dates;
