use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::gallery::files::create_folder_if_not_exists;
use crate::gallery::photo::THUMBNAILS_DIR;
use crate::gallery::{PhotoRepository, TimelapseGallery};
use crate::settings::Settings;

pub const PHOTOS_DIR: &str = "photos";
pub const TIMELAPSES_DIR: &str = "timelapses";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub photos: Arc<RwLock<PhotoRepository>>,
    pub timelapses: Arc<RwLock<TimelapseGallery>>,
    pub settings: Arc<RwLock<Settings>>,
    pub settings_file: Arc<PathBuf>,
}

impl AppState {
    /// Prepare the static tree under `static_dir` and load the gallery indexes from it.
    pub fn open(static_dir: &Path, settings_file: &Path) -> anyhow::Result<Self> {
        let photos_dir = static_dir.join(PHOTOS_DIR);
        let timelapses_dir = static_dir.join(TIMELAPSES_DIR);
        for folder in [&photos_dir, &photos_dir.join(THUMBNAILS_DIR), &timelapses_dir] {
            create_folder_if_not_exists(folder)
                .with_context(|| format!("failed to create {}", folder.display()))?;
        }

        let photos = PhotoRepository::load(&photos_dir)
            .with_context(|| format!("failed to load photo index from {}", photos_dir.display()))?;
        let timelapses = TimelapseGallery::scan(&timelapses_dir)
            .with_context(|| format!("failed to scan timelapses in {}", timelapses_dir.display()))?;
        let settings = Settings::load(settings_file)
            .with_context(|| format!("failed to load settings from {}", settings_file.display()))?;

        info!(
            "Loaded {} photos and {} timelapses from {}",
            photos.len(),
            timelapses.len(),
            static_dir.display()
        );

        Ok(Self {
            photos: Arc::new(RwLock::new(photos)),
            timelapses: Arc::new(RwLock::new(timelapses)),
            settings: Arc::new(RwLock::new(settings)),
            settings_file: Arc::new(settings_file.to_path_buf()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_static_tree() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(dir.path(), &dir.path().join("settings.json")).unwrap();

        assert!(dir.path().join("photos").join("thumbnails").is_dir());
        assert!(dir.path().join("timelapses").is_dir());
        assert!(state.photos.read().await.is_empty());
        assert!(state.timelapses.read().await.is_empty());
        assert_eq!(state.settings.read().await.photo_directory, None);
    }
}
