//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Startup-time failures while loading resource definitions. Never surfaced to clients.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("schema directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid resource name '{0}'")]
    InvalidName(String),
    #[error("resource name '{0}' is reserved")]
    ReservedName(String),
    #[error("schema '{name}': {message}")]
    InvalidDefinition { name: String, message: String },
    #[error("collection '{name}': {source}")]
    Collection {
        name: String,
        #[source]
        source: StoreError,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("invalid collection name: {0}")]
    InvalidCollection(String),
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("stored document is not a JSON object: {0}")]
    Corrupt(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Validation(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(m) | AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Item not found".to_string()),
            AppError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            AppError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::Validation("x".into()).into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("abc".into()).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("taken".into()).into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Store(StoreError::UnknownCollection("note".into())).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
