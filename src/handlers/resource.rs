//! Generic resource handlers. The dispatcher binds one set per registered resource.

use crate::config::ResourceBinding;
use crate::error::AppError;
use crate::response::{success, success_with_data};
use crate::service::{CrudService, Identity};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// Missing or malformed JSON bodies are client errors.
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

pub async fn create(
    binding: ResourceBinding,
    identity: Identity,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(resource = %binding.name(), subject = %identity.subject, "create");
    let body = json_body(payload)?;
    CrudService::create(&binding, &identity, body).await?;
    Ok(success(StatusCode::CREATED))
}

pub async fn read(binding: ResourceBinding, identity: Identity) -> Result<impl IntoResponse, AppError> {
    tracing::info!(resource = %binding.name(), subject = %identity.subject, "read");
    let items = CrudService::list(&binding).await?;
    Ok((StatusCode::OK, Json(items)))
}

pub async fn update(
    binding: ResourceBinding,
    identity: Identity,
    id: String,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(resource = %binding.name(), %id, subject = %identity.subject, "update");
    let body = json_body(payload)?;
    let data = CrudService::update(&binding, &identity, &id, body).await?;
    Ok(success_with_data(data))
}

pub async fn delete(binding: ResourceBinding, identity: Identity, id: String) -> Result<impl IntoResponse, AppError> {
    tracing::info!(resource = %binding.name(), %id, subject = %identity.subject, "delete");
    CrudService::delete(&binding, &identity, &id).await?;
    Ok(success(StatusCode::OK))
}
