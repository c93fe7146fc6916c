// handlers/gallery.rs - read-only photo and timelapse listings

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::gallery::{DateGroup, TimelapseFrame, TimelapseItem};
use crate::server::AppState;

/// GET /gallery - photos grouped by capture date, newest first
pub async fn gallery(State(state): State<AppState>) -> Json<Vec<DateGroup>> {
    Json(state.photos.read().await.organize_by_date())
}

/// GET /timelapse-gallery - timelapses in start order
pub async fn timelapse_gallery(State(state): State<AppState>) -> Json<Vec<TimelapseItem>> {
    let gallery = state.timelapses.read().await;
    Json(gallery.list().into_iter().cloned().collect())
}

#[derive(Debug, Serialize)]
pub struct TimelapseView {
    #[serde(flatten)]
    pub item: TimelapseItem,
    pub frames: Vec<TimelapseFrame>,
}

/// GET /timelapse-gallery/view/:timelapse
pub async fn timelapse_view(
    State(state): State<AppState>,
    Path(timelapse): Path<String>,
) -> Result<Json<TimelapseView>, ApiError> {
    let gallery = state.timelapses.read().await;
    let item = gallery
        .get(&timelapse)
        .ok_or_else(|| ApiError::not_found(format!("Timelapse '{}' not found", timelapse)))?;

    Ok(Json(TimelapseView {
        frames: item.frames(),
        item: item.clone(),
    }))
}
