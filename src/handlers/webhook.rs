use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Local;

use crate::errors::AppError;
use crate::models::{Intent, WebhookRequest, WebhookResponse};
use crate::services::bookings;
use crate::state::AppState;

// POST /Agent-hook
pub async fn agent_hook(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WebhookRequest>,
) -> Result<Json<WebhookResponse>, AppError> {
    tracing::info!(
        handler = ?request.handler_name(),
        params = ?request.params(),
        "agent hook"
    );

    let intent = Intent::from_request(&request);
    let intent_name = intent.name().to_string();
    let today = Local::now().date_naive();

    // Held across lookup, validation and persistence so requests never
    // interleave on the same collection.
    let mut store = state
        .store
        .lock()
        .map_err(|_| AppError::Storage("booking store lock poisoned".to_string()))?;

    let response = bookings::dispatch(&mut **store, intent, today).map_err(|e| {
        tracing::error!(error = %e, intent = %intent_name, "agent hook failed");
        e
    })?;

    Ok(Json(response))
}
