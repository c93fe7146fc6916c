use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Timelapse directories are named after their start time
pub const TIMELAPSE_DATE_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const THUMBNAILS_DIR: &str = "tmp";
const REFERENCE_PHOTO: &str = "ref.jpg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelapseItem {
    pub timelapse_date: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub jpg_files: Vec<String>,
    pub dng_files: Vec<String>,
    pub thumbnails_files: Vec<String>,
}

impl TimelapseItem {
    /// Empty item, or `None` when `timelapse_date` is not a start timestamp.
    pub fn new(timelapse_date: &str) -> Option<Self> {
        let start = NaiveDateTime::parse_from_str(timelapse_date, TIMELAPSE_DATE_FORMAT).ok()?;
        Some(Self {
            timelapse_date: timelapse_date.to_string(),
            start_date: start.date(),
            start_time: start.time(),
            jpg_files: Vec::new(),
            dng_files: Vec::new(),
            thumbnails_files: Vec::new(),
        })
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time)
    }

    /// Frame details for every thumbnail whose name can be parsed
    pub fn frames(&self) -> Vec<TimelapseFrame> {
        self.thumbnails_files
            .iter()
            .filter_map(|name| TimelapseFrame::from_file_name(name))
            .collect()
    }
}

/// All timelapses found under one directory, keyed by start timestamp.
#[derive(Debug)]
pub struct TimelapseGallery {
    root: PathBuf,
    galleries: HashMap<String, TimelapseItem>,
}

impl TimelapseGallery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            galleries: HashMap::new(),
        }
    }

    /// Build the gallery from the timelapse directories under `root`.
    pub fn scan(root: impl Into<PathBuf>) -> io::Result<Self> {
        let mut gallery = Self::new(root);

        for entry in fs::read_dir(&gallery.root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let Some(folder_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(mut item) = TimelapseItem::new(folder_name) else {
                warn!("Skipping timelapse folder with unexpected name: {}", path.display());
                continue;
            };

            item.jpg_files = files_with_extension(&path, "jpg")?;
            item.dng_files = files_with_extension(&path, "dng")?;
            item.thumbnails_files = thumbnails(&path.join(THUMBNAILS_DIR))?;
            gallery.galleries.insert(folder_name.to_string(), item);
        }

        Ok(gallery)
    }

    /// Timelapses in start time order
    pub fn list(&self) -> Vec<&TimelapseItem> {
        let mut items: Vec<&TimelapseItem> = self.galleries.values().collect();
        items.sort_by_key(|item| item.started_at());
        items
    }

    pub fn get(&self, timelapse_date: &str) -> Option<&TimelapseItem> {
        self.galleries.get(timelapse_date)
    }

    /// Register a new, empty timelapse. Returns false for a malformed start timestamp.
    pub fn add_timelapse(&mut self, timelapse_date: &str) -> bool {
        match TimelapseItem::new(timelapse_date) {
            Some(item) => {
                self.galleries.insert(timelapse_date.to_string(), item);
                true
            }
            None => false,
        }
    }

    pub fn add_jpg(&mut self, timelapse_date: &str, jpg_path: &str) -> bool {
        self.push_file(timelapse_date, |item| &mut item.jpg_files, jpg_path)
    }

    pub fn add_dng(&mut self, timelapse_date: &str, dng_path: &str) -> bool {
        self.push_file(timelapse_date, |item| &mut item.dng_files, dng_path)
    }

    pub fn add_thumbnail(&mut self, timelapse_date: &str, thumbnail_path: &str) -> bool {
        self.push_file(timelapse_date, |item| &mut item.thumbnails_files, thumbnail_path)
    }

    fn push_file(
        &mut self,
        timelapse_date: &str,
        files: impl FnOnce(&mut TimelapseItem) -> &mut Vec<String>,
        path: &str,
    ) -> bool {
        match self.galleries.get_mut(timelapse_date) {
            Some(item) => {
                files(item).push(path.to_string());
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, timelapse_date: &str) -> Option<TimelapseItem> {
        self.galleries.remove(timelapse_date)
    }

    pub fn len(&self) -> usize {
        self.galleries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.galleries.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a timelapse, `None` if the name would escape the gallery root.
    pub fn path_for(&self, timelapse: &str) -> Option<PathBuf> {
        let mut components = Path::new(timelapse).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.root.join(timelapse)),
            _ => None,
        }
    }
}

fn files_with_extension(dir: &Path, extension: &str) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
    }
    files.sort();
    Ok(files)
}

fn thumbnails(tmp_dir: &Path) -> io::Result<Vec<String>> {
    if !tmp_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(tmp_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name != REFERENCE_PHOTO && path.is_file() {
            files.push(name.to_string());
        }
    }
    files.sort();
    Ok(files)
}

static FULL_FRAME_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^tl_([0-9]+)_([0-9]{4}-[0-9]{2}-[0-9]{2})_([0-9]{2}-[0-9]{2}-[0-9]{2})_ISO_([0-9]+)_([0-9s-]+)\.jpg$")
        .expect("valid frame name pattern")
});

static SHORT_FRAME_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tl_([0-9]+)\.jpg$").expect("valid frame name pattern"));

/// Details encoded in a timelapse frame file name, e.g.
/// `tl_007_2024-05-01_21-04-10_ISO_800_1-60s.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelapseFrame {
    pub file_name: String,
    pub number: u32,
    pub date: Option<String>,
    pub time: Option<String>,
    pub iso: Option<u32>,
    pub exposure_time: Option<String>,
}

impl TimelapseFrame {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if let Some(caps) = FULL_FRAME_NAME.captures(file_name) {
            return Some(Self {
                file_name: file_name.to_string(),
                number: caps[1].parse().ok()?,
                date: Some(caps[2].to_string()),
                time: Some(caps[3].to_string()),
                iso: caps[4].parse().ok(),
                exposure_time: Some(format_exposure_time(&caps[5])),
            });
        }

        let caps = SHORT_FRAME_NAME.captures(file_name)?;
        Some(Self {
            file_name: file_name.to_string(),
            number: caps[1].parse().ok()?,
            date: None,
            time: None,
            iso: None,
            exposure_time: None,
        })
    }
}

/// File names carry `1-60s` for an exposure of `1/60s`.
pub fn format_exposure_time(exposure_time: &str) -> String {
    exposure_time.replace('-', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_scan() {
        let dir = tempfile::tempdir().unwrap();
        let lapse = dir.path().join("2024-05-01_21-00-00");
        fs::create_dir_all(lapse.join("tmp")).unwrap();
        touch(&lapse.join("tl_2_2024-05-01_21-00-30_ISO_100_1-60s.jpg"));
        touch(&lapse.join("tl_1_2024-05-01_21-00-00_ISO_100_1-60s.jpg"));
        touch(&lapse.join("tl_1_2024-05-01_21-00-00_ISO_100_1-60s.dng"));
        touch(&lapse.join("tmp").join("ref.jpg"));
        touch(&lapse.join("tmp").join("tl_1_2024-05-01_21-00-00_ISO_100_1-60s.jpg"));

        // No tmp folder
        fs::create_dir(dir.path().join("2024-04-30_06-15-00")).unwrap();
        // Not a timelapse
        fs::create_dir(dir.path().join("exports")).unwrap();
        touch(&dir.path().join("notes.txt"));

        let gallery = TimelapseGallery::scan(dir.path()).unwrap();
        assert_eq!(gallery.len(), 2);

        let item = gallery.get("2024-05-01_21-00-00").unwrap();
        assert_eq!(
            item.jpg_files,
            vec![
                "tl_1_2024-05-01_21-00-00_ISO_100_1-60s.jpg",
                "tl_2_2024-05-01_21-00-30_ISO_100_1-60s.jpg"
            ]
        );
        assert_eq!(item.dng_files.len(), 1);
        assert_eq!(item.thumbnails_files, vec!["tl_1_2024-05-01_21-00-00_ISO_100_1-60s.jpg"]);

        let early = gallery.get("2024-04-30_06-15-00").unwrap();
        assert!(early.thumbnails_files.is_empty());
    }

    #[test]
    fn test_list_orders_by_start() {
        let mut gallery = TimelapseGallery::new("/unused");
        assert!(gallery.add_timelapse("2024-05-02_01-00-00"));
        assert!(gallery.add_timelapse("2023-12-31_23-59-59"));
        assert!(gallery.add_timelapse("2024-05-01_22-00-00"));
        assert!(!gallery.add_timelapse("yesterday"));

        let order: Vec<&str> = gallery.list().iter().map(|i| i.timelapse_date.as_str()).collect();
        assert_eq!(order, vec!["2023-12-31_23-59-59", "2024-05-01_22-00-00", "2024-05-02_01-00-00"]);
    }

    #[test]
    fn test_add_files_and_remove() {
        let mut gallery = TimelapseGallery::new("/unused");
        gallery.add_timelapse("2024-05-01_21-00-00");

        assert!(gallery.add_jpg("2024-05-01_21-00-00", "a.jpg"));
        assert!(gallery.add_dng("2024-05-01_21-00-00", "a.dng"));
        assert!(gallery.add_thumbnail("2024-05-01_21-00-00", "tmp/a.jpg"));
        assert!(!gallery.add_jpg("2024-05-02_00-00-00", "b.jpg"));

        let item = gallery.get("2024-05-01_21-00-00").unwrap();
        assert_eq!(item.thumbnails_files, vec!["tmp/a.jpg"]);
        assert_eq!(item.dng_files, vec!["a.dng"]);

        assert!(gallery.remove("2024-05-01_21-00-00").is_some());
        assert!(gallery.remove("2024-05-01_21-00-00").is_none());
        assert!(gallery.is_empty());
    }

    #[test]
    fn test_path_for_rejects_escapes() {
        let gallery = TimelapseGallery::new("/srv/static/timelapses");
        assert_eq!(
            gallery.path_for("2024-05-01_21-00-00"),
            Some(PathBuf::from("/srv/static/timelapses/2024-05-01_21-00-00"))
        );
        assert_eq!(gallery.path_for(".."), None);
        assert_eq!(gallery.path_for("../photos"), None);
        assert_eq!(gallery.path_for("a/b"), None);
        assert_eq!(gallery.path_for("/etc"), None);
        assert_eq!(gallery.path_for(""), None);
    }

    #[test]
    fn test_frame_from_full_name() {
        let frame = TimelapseFrame::from_file_name("tl_007_2024-05-01_21-04-10_ISO_800_1-60s.jpg").unwrap();
        assert_eq!(frame.number, 7);
        assert_eq!(frame.date.as_deref(), Some("2024-05-01"));
        assert_eq!(frame.time.as_deref(), Some("21-04-10"));
        assert_eq!(frame.iso, Some(800));
        assert_eq!(frame.exposure_time.as_deref(), Some("1/60s"));
    }

    #[test]
    fn test_frame_from_short_name() {
        let frame = TimelapseFrame::from_file_name("tl_12.jpg").unwrap();
        assert_eq!(frame.number, 12);
        assert_eq!(frame.date, None);
        assert_eq!(frame.exposure_time, None);

        assert!(TimelapseFrame::from_file_name("ref.jpg").is_none());
        assert!(TimelapseFrame::from_file_name("tl_12.dng").is_none());
    }

    #[test]
    fn test_format_exposure_time() {
        assert_eq!(format_exposure_time("1-3200s"), "1/3200s");
        assert_eq!(format_exposure_time("30s"), "30s");
    }
}
