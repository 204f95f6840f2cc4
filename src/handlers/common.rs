//! Health check and the static event list.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "healthy" })
}

/// `GET /static_events`: contents of the configured JSON file, read per request.
pub async fn static_events(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let path = state.static_events_path.as_path();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Internal(format!("{}: {}", path.display(), e)))?;
    let events: Value =
        serde_json::from_str(&raw).map_err(|e| AppError::Internal(format!("{}: {}", path.display(), e)))?;
    tracing::info!("static events retrieved");
    Ok(Json(events))
}
