pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health::home))
        .route("//", get(handlers::health::home))
        .route("/Agent-hook", post(handlers::webhook::agent_hook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
