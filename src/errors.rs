use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Infrastructure failures. Business outcomes never end up here; they are
/// reported to the dialogue layer as prompt text with a 200 status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Business rejections. The `Display` text is what the guest sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("No booking found.")]
    NoBookingFound,

    #[error("Booking not found.")]
    NotFound,

    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidDateFormat,

    #[error("Check-in date must be after today's date.")]
    CheckInNotAfterToday,

    #[error("Check-out date must be after the check-in date.")]
    CheckOutNotAfterCheckIn,

    #[error("Check-in and check-out dates must be after today's date.")]
    StayNotAfterToday,

    #[error("Number of guests must be a whole number.")]
    InvalidGuestCount,
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<tempfile::PersistError> for AppError {
    fn from(err: tempfile::PersistError) -> Self {
        AppError::Storage(err.error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
