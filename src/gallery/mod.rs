pub mod files;
pub mod photo;
pub mod timelapse;

use thiserror::Error;

/// Errors reading or writing the gallery indexes on disk
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid index file: {0}")]
    Json(#[from] serde_json::Error),
}

pub use photo::{CaptureSetting, DateGroup, Photo, PhotoRepository};
pub use timelapse::{TimelapseFrame, TimelapseGallery, TimelapseItem};
