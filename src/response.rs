//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

pub fn success(status: StatusCode) -> (StatusCode, Json<StatusBody>) {
    (
        status,
        Json(StatusBody {
            status: "success",
            data: None,
        }),
    )
}

pub fn success_with_data(data: Value) -> (StatusCode, Json<StatusBody>) {
    (
        StatusCode::OK,
        Json(StatusBody {
            status: "success",
            data: Some(data),
        }),
    )
}
