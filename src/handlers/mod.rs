pub mod delete;
pub mod gallery;
pub mod settings;

use axum::{body::Bytes, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Parse a request body as JSON whatever its declared content type.
pub(crate) fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::invalid_json(format!("Invalid JSON body: {}", e)))
}
