use axum::Json;
use serde_json::{json, Value};

pub const WELCOME_MESSAGE: &str = "Welcome to Dash Hotel Booking API_Daphne";

// GET // (and GET /)
pub async fn home() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}
