//! Fixed routes: health, account and token endpoints, static events.

use crate::handlers::auth::{login, refresh_token, register};
use crate::handlers::common::{health, static_events};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// GET /health, POST /register, POST /auth, POST /refresh_token, GET /static_events.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/auth", post(login))
        .route("/refresh_token", post(refresh_token))
        .route("/static_events", get(static_events))
        .with_state(state)
}
