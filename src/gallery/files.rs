use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info};

/// Delete a photo file.
///
/// Returns true when the file was deleted, when it does not exist, or when
/// there was no path to begin with.
pub fn delete_file(path: Option<&Path>) -> bool {
    let Some(path) = path else {
        return true;
    };
    if !path.exists() {
        return true;
    }
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Deleted photo: {}", path.display());
            true
        }
        Err(e) => {
            error!("Error while deleting {}: {}", path.display(), e);
            false
        }
    }
}

pub fn create_folder_if_not_exists(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_file() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("2024-05-01_10-00-00.jpg");
        fs::write(&photo, b"jpeg").unwrap();

        assert!(delete_file(Some(&photo)));
        assert!(!photo.exists());
        // Already gone
        assert!(delete_file(Some(&photo)));
        assert!(delete_file(None));
    }

    #[test]
    fn test_delete_file_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_file = dir.path().join("folder");
        fs::create_dir(&not_a_file).unwrap();

        assert!(!delete_file(Some(&not_a_file)));
        assert!(not_a_file.exists());
    }

    #[test]
    fn test_create_folder_if_not_exists() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("photos").join("thumbnails");

        create_folder_if_not_exists(&nested).unwrap();
        assert!(nested.is_dir());
        create_folder_if_not_exists(&nested).unwrap();
    }
}
