// handlers/delete.rs - POST /deletephoto and POST /deletetimelapse

use axum::{body::Bytes, extract::State, response::Json};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::parse_json_body;
use crate::error::ApiError;
use crate::gallery::files::delete_file;
use crate::server::AppState;

/// Reply read by the gallery pages; only `error` is looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteReply {
    pub error: bool,
}

impl DeleteReply {
    pub fn deleted() -> Json<Self> {
        Json(Self { error: false })
    }

    pub fn failed() -> Json<Self> {
        Json(Self { error: true })
    }
}

/// Delete every version of a photo (JPG and DNG), then its thumbnail.
///
/// Body: `{"name": "<photo name>"}`. Files are removed on the blocking pool;
/// the index is only locked for writing once they are gone.
pub async fn delete_photo(State(state): State<AppState>, body: Bytes) -> Result<Json<DeleteReply>, ApiError> {
    let input = parse_json_body(&body)?;
    let Some(name) = input.get("name").and_then(Value::as_str) else {
        warn!("Photo deletion requested without a name");
        return Ok(DeleteReply::failed());
    };

    let (jpg_path, dng_path, thumbnail_path) = {
        let photos = state.photos.read().await;
        let Some(photo) = photos.get(name) else {
            warn!("Photo deletion requested for unknown photo '{}'", name);
            return Ok(DeleteReply::failed());
        };
        (
            photo.jpg_path.as_deref().map(|p| photos.file_path(p)),
            photo.dng_path.as_deref().map(|p| photos.file_path(p)),
            photos.thumbnail_path(name),
        )
    };

    let files_deleted = tokio::task::spawn_blocking(move || {
        let jpg_deleted = delete_file(jpg_path.as_deref());
        let dng_deleted = delete_file(dng_path.as_deref());
        jpg_deleted && dng_deleted
    })
    .await
    .map_err(|e| ApiError::internal_server_error(format!("Photo deletion task failed: {}", e)))?;

    if !files_deleted {
        return Ok(DeleteReply::failed());
    }

    state.photos.write().await.remove(name)?;
    if let Err(e) = tokio::task::spawn_blocking(move || delete_file(Some(&thumbnail_path))).await {
        error!("Thumbnail deletion task failed: {}", e);
    }
    info!("Photo '{}' deleted", name);
    Ok(DeleteReply::deleted())
}

/// Delete a timelapse directory with everything in it.
///
/// Body: `{"timelapse": "<start timestamp>"}`. A timelapse that is not on disk
/// counts as deleted. The gallery is only locked for writing once the folder
/// is gone.
pub async fn delete_timelapse(State(state): State<AppState>, body: Bytes) -> Result<Json<DeleteReply>, ApiError> {
    let input = parse_json_body(&body)?;
    let timelapse = input
        .get("timelapse")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request("Missing 'timelapse' field"))?;

    let Some(path) = state.timelapses.read().await.path_for(timelapse) else {
        warn!("Refusing to delete timelapse outside the gallery: '{}'", timelapse);
        return Ok(DeleteReply::failed());
    };

    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Ok(DeleteReply::deleted());
    }

    if let Err(e) = tokio::fs::remove_dir_all(&path).await {
        error!("Error while deleting timelapse {}: {}", path.display(), e);
        return Ok(DeleteReply::failed());
    }
    info!("Timelapse deleted: {}", timelapse);
    state.timelapses.write().await.remove(timelapse);

    Ok(DeleteReply::deleted())
}
