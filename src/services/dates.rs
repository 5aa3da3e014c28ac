use chrono::NaiveDate;

use crate::errors::BookingError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Strict `YYYY-MM-DD`. Padding is rejected rather than trimmed since the
/// value is stored exactly as sent.
pub fn parse_date(s: &str) -> Result<NaiveDate, BookingError> {
    // chrono skips whitespace ahead of numeric fields
    if s.chars().any(char::is_whitespace) {
        return Err(BookingError::InvalidDateFormat);
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| BookingError::InvalidDateFormat)
}

/// A parsed check-in/check-out pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayDates {
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, BookingError> {
        Ok(Self {
            check_in: parse_date(check_in)?,
            check_out: parse_date(check_out)?,
        })
    }

    /// Rules for changing an existing booking: the stay starts after today
    /// and ends after it starts.
    pub fn validate_for_modify(&self, today: NaiveDate) -> Result<(), BookingError> {
        if self.check_in <= today {
            return Err(BookingError::CheckInNotAfterToday);
        }
        if self.check_out <= self.check_in {
            return Err(BookingError::CheckOutNotAfterCheckIn);
        }
        Ok(())
    }

    /// Rules for a new booking: both dates after today. Ordering between the
    /// two is not checked here.
    pub fn validate_for_create(&self, today: NaiveDate) -> Result<(), BookingError> {
        if today >= self.check_in || today >= self.check_out {
            return Err(BookingError::StayNotAfterToday);
        }
        Ok(())
    }
}
