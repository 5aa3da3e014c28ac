use serde_json::{Map, Value};

use super::WebhookRequest;
use crate::errors::BookingError;

/// A decoded agent-hook request. Each variant carries only the parameters its
/// handler reads.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    View(BookingLookup),
    Cancel(BookingLookup),
    Modify(ModifyBooking),
    Create(CreateBooking),
    Unknown(Option<String>),
}

/// Identifies a booking and proves ownership through its email.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingLookup {
    pub booking_id: i64,
    pub email: String,
}

/// Guest-editable fields. `None` means the caller did not send the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFields {
    pub guest_name: Option<String>,
    pub phone: Option<String>,
    pub hotel_branch: Option<String>,
    pub room_type: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub num_guests: Option<GuestCount>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifyBooking {
    pub lookup: BookingLookup,
    pub fields: BookingFields,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBooking {
    pub email: Option<String>,
    pub fields: BookingFields,
}

/// Guest count as sent by the caller. Rejection of a malformed count is
/// deferred to the handler so it happens after lookup and date checks.
#[derive(Debug, Clone, PartialEq)]
pub enum GuestCount {
    Valid(i64),
    Invalid(String),
}

impl GuestCount {
    pub fn resolve(&self) -> Result<i64, BookingError> {
        match self {
            GuestCount::Valid(n) => Ok(*n),
            GuestCount::Invalid(raw) => {
                tracing::info!(num_guests = %raw, "guest count is not a whole number");
                Err(BookingError::InvalidGuestCount)
            }
        }
    }
}

impl Intent {
    pub fn from_request(request: &WebhookRequest) -> Self {
        let empty = Map::new();
        let params = request.params().unwrap_or(&empty);

        match request.handler_name() {
            Some("view_booking") => Intent::View(BookingLookup::from_params(params)),
            Some("cancel_booking") => Intent::Cancel(BookingLookup::from_params(params)),
            Some("modify_booking") => Intent::Modify(ModifyBooking {
                lookup: BookingLookup::from_params(params),
                fields: BookingFields::from_params(params),
            }),
            Some("create_booking") => Intent::Create(CreateBooking {
                email: param_string(params, "email"),
                fields: BookingFields::from_params(params),
            }),
            other => Intent::Unknown(other.map(str::to_string)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Intent::View(_) => "view_booking",
            Intent::Cancel(_) => "cancel_booking",
            Intent::Modify(_) => "modify_booking",
            Intent::Create(_) => "create_booking",
            Intent::Unknown(name) => name.as_deref().unwrap_or(""),
        }
    }
}

impl BookingLookup {
    fn from_params(params: &Map<String, Value>) -> Self {
        Self {
            booking_id: params.get("booking_id").and_then(value_to_i64).unwrap_or(0),
            email: param_string(params, "email").unwrap_or_default(),
        }
    }
}

impl BookingFields {
    fn from_params(params: &Map<String, Value>) -> Self {
        let num_guests = params
            .get("num_guests")
            .filter(|v| !v.is_null())
            .map(|v| match value_to_i64(v) {
                Some(n) => GuestCount::Valid(n),
                None => GuestCount::Invalid(value_to_string(v)),
            });

        Self {
            guest_name: param_string(params, "guest_name"),
            phone: param_string(params, "phone"),
            hotel_branch: param_string(params, "hotel_branch"),
            room_type: param_string(params, "room_type"),
            check_in: param_string(params, "check_in"),
            check_out: param_string(params, "check_out"),
            num_guests,
            payment_status: param_string(params, "payment_status"),
        }
    }
}

// ── Parameter coercion ──
//
// Dialogue platforms send numbers as floats and free text as numbers (phone
// numbers in particular), so scalars are accepted in either form. `null` is
// treated the same as a missing key.

fn param_string(params: &Map<String, Value>, key: &str) -> Option<String> {
    params
        .get(key)
        .filter(|v| !v.is_null())
        .map(value_to_string)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64().or_else(|| n.as_f64().and_then(whole_f64)) {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_f64))
        }
        _ => None,
    }
}

fn whole_f64(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}
