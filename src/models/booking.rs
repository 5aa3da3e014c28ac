use serde::{Deserialize, Serialize};

/// Column order of the backing CSV file. Existing files depend on it.
pub const CSV_COLUMNS: [&str; 12] = [
    "booking_id",
    "created_on",
    "modified_on",
    "guest_name",
    "email",
    "phone",
    "hotel_branch",
    "room_type",
    "check_in",
    "check_out",
    "num_guests",
    "payment_status",
];

pub const DEFAULT_PAYMENT_STATUS: &str = "Unpaid";

/// A hotel reservation. Field order matches [`CSV_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: i64,
    #[serde(default)]
    pub created_on: String,
    #[serde(default)]
    pub modified_on: String,
    #[serde(default)]
    pub guest_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hotel_branch: String,
    #[serde(default)]
    pub room_type: String,
    #[serde(default)]
    pub check_in: String,
    #[serde(default)]
    pub check_out: String,
    pub num_guests: i64,
    #[serde(default)]
    pub payment_status: String,
}

impl Booking {
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}
