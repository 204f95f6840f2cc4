//! Token endpoints: registration, credential login and access-token refresh.

use crate::error::AppError;
use crate::handlers::resource::json_body;
use crate::response::{success, StatusBody};
use crate::state::AppState;
use crate::token::{TokenService, TokenType};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Serialize)]
pub struct AccessTokenBody {
    pub access_token: String,
}

/// Non-empty string field of a JSON body.
fn string_field<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// `POST /refresh_token`: trade a valid refresh token for a new access token.
pub async fn refresh_token(
    State(tokens): State<Arc<TokenService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AccessTokenBody>, AppError> {
    let body = json_body(payload)?;
    let token = string_field(&body, "refresh_token")
        .ok_or_else(|| AppError::BadRequest("Missing refresh token".into()))?;
    let claims = tokens.verify(token, TokenType::Refresh).ok_or_else(|| {
        tracing::warn!("invalid refresh token");
        AppError::Unauthorized
    })?;
    let access_token = tokens
        .issue_access_token(&claims.sub)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::info!(subject = %claims.sub, "access token refreshed");
    Ok(Json(AccessTokenBody { access_token }))
}

fn credentials_from(body: &Value) -> Result<(&str, &str), AppError> {
    match (string_field(body, "username"), string_field(body, "password")) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(AppError::BadRequest("Missing username or password".into())),
    }
}

/// `POST /register`: claim a username. 409 when it is already taken.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<StatusBody>), AppError> {
    let body = json_body(payload)?;
    let (username, password) = credentials_from(&body)?;
    state.credentials.register(username, password).await.map_err(|e| {
        tracing::warn!(%username, error = %e, "registration rejected");
        AppError::from(e)
    })?;
    tracing::info!(%username, "registered");
    Ok(success(StatusCode::CREATED))
}

/// `POST /auth`: check credentials and issue an access/refresh pair.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = json_body(payload)?;
    let (username, password) = credentials_from(&body)?;
    if !state.credentials.verify(username, password).await? {
        tracing::warn!(%username, "login rejected");
        return Err(AppError::Unauthorized);
    }
    let pair = state
        .tokens
        .issue_pair(username)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::info!(%username, "login");
    Ok(Json(pair))
}
