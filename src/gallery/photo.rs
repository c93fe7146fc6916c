use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::RepositoryError;

pub const INDEX_FILE: &str = "photos.json";
pub const THUMBNAILS_DIR: &str = "thumbnails";

/// A photo shot by the camera. Paths are relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub name: String,
    pub iso: CaptureSetting,
    pub speed: CaptureSetting,
    pub exposure_time: String,
    pub white_balance: String,
    pub capture_date: String,
    pub dng_path: Option<String>,
    pub jpg_path: Option<String>,
}

/// ISO or shutter speed as the shoot form posted it: a number, or text such as "Auto".
/// Written back to the index in the same JSON type it was read with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaptureSetting {
    Number(serde_json::Number),
    Text(String),
}

impl From<i64> for CaptureSetting {
    fn from(value: i64) -> Self {
        CaptureSetting::Number(value.into())
    }
}

impl From<&str> for CaptureSetting {
    fn from(value: &str) -> Self {
        CaptureSetting::Text(value.to_string())
    }
}

impl fmt::Display for CaptureSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureSetting::Number(n) => write!(f, "{}", n),
            CaptureSetting::Text(s) => f.write_str(s),
        }
    }
}

/// Photos captured on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: String,
    pub photos: Vec<Photo>,
}

/// Index of the photos in a directory, persisted as `photos.json` next to them.
#[derive(Debug)]
pub struct PhotoRepository {
    root: PathBuf,
    photos: HashMap<String, Photo>,
}

impl PhotoRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            photos: HashMap::new(),
        }
    }

    /// Load the index from `root`, dropping references to files that no longer
    /// exist. The index is rewritten when anything had to be dropped.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let mut repository = Self::new(root);
        let index = repository.index_path();
        if !index.exists() {
            return Ok(repository);
        }

        let content = fs::read_to_string(&index)?;
        let stored: HashMap<String, Photo> = serde_json::from_str(&content)?;

        let mut needs_cleaning = false;
        for (name, mut photo) in stored {
            let jpg_exists = repository.prune_missing(&mut photo.jpg_path, &mut needs_cleaning);
            let dng_exists = repository.prune_missing(&mut photo.dng_path, &mut needs_cleaning);
            if jpg_exists || dng_exists {
                repository.photos.insert(name, photo);
            } else {
                warn!("Dropping photo '{}' with no file left on disk", name);
            }
        }

        if needs_cleaning {
            info!("Rewriting {} after pruning missing files", index.display());
            repository.save()?;
        }
        Ok(repository)
    }

    fn prune_missing(&self, path: &mut Option<String>, needs_cleaning: &mut bool) -> bool {
        let exists = match path.as_deref() {
            Some(relative) => self.root.join(relative).exists(),
            None => return false,
        };
        if !exists {
            *path = None;
            *needs_cleaning = true;
        }
        exists
    }

    pub fn save(&self) -> Result<(), RepositoryError> {
        let content = serde_json::to_string_pretty(&self.photos)?;
        fs::write(self.index_path(), content)?;
        Ok(())
    }

    /// Add a photo, replacing any photo with the same name.
    pub fn add(&mut self, photo: Photo) -> Result<(), RepositoryError> {
        self.photos.insert(photo.name.clone(), photo);
        self.save()
    }

    pub fn get(&self, name: &str) -> Option<&Photo> {
        self.photos.get(name)
    }

    /// Remove a photo from the index. Returns false when it was not there.
    pub fn remove(&mut self, name: &str) -> Result<bool, RepositoryError> {
        if self.photos.remove(name).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Photos grouped by capture date, most recent date first, sorted by name within a date.
    pub fn organize_by_date(&self) -> Vec<DateGroup> {
        let mut by_date: BTreeMap<&str, Vec<Photo>> = BTreeMap::new();
        for photo in self.photos.values() {
            by_date
                .entry(photo.capture_date.as_str())
                .or_default()
                .push(photo.clone());
        }

        by_date
            .into_iter()
            .rev()
            .map(|(date, mut photos)| {
                photos.sort_by(|a, b| a.name.cmp(&b.name));
                DateGroup {
                    date: date.to_string(),
                    photos,
                }
            })
            .collect()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn file_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn thumbnail_path(&self, name: &str) -> PathBuf {
        self.root.join(THUMBNAILS_DIR).join(format!("{}.jpg", name))
    }
}
