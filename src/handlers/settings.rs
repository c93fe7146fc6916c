// handlers/settings.rs - GET /settings and POST /saveSettings

use axum::{body::Bytes, extract::State, response::Json};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::parse_json_body;
use crate::error::ApiError;
use crate::server::AppState;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveReply {
    pub error: bool,
}

pub async fn show_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings.read().await.clone())
}

/// Body: `{"photosDirectory": "<path>"}`
pub async fn save_settings(State(state): State<AppState>, body: Bytes) -> Result<Json<SaveReply>, ApiError> {
    let input = parse_json_body(&body)?;
    let photo_directory = input
        .get("photosDirectory")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request("Missing 'photosDirectory' field"))?;

    let mut settings = state.settings.write().await;
    let updated = Settings {
        photo_directory: Some(photo_directory.to_string()),
    };
    if let Err(e) = updated.save(&state.settings_file) {
        warn!("{}", e);
        return Ok(Json(SaveReply { error: true }));
    }
    *settings = updated;
    Ok(Json(SaveReply { error: false }))
}
