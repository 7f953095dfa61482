//! Media discovery.
//!
//! Walks the chosen folder, picks photos and videos by extension, and
//! stamps each with a capture time read from the filesystem. Folders
//! that cannot be read are logged and skipped; only a folder tree with
//! no usable media at all is an error.
//!
//! Working files are named after an item's base name, so within one kind
//! base names must be unique (ignoring case). Camera cards restart their
//! numbering in every `1xxCANON` folder; the first file in walk order
//! keeps the name and later ones are skipped.

use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::DiscoverySettings;
use crate::models::{MediaItem, MediaKind, StoryRequest, TimestampSource};

/// Error type for discovery.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Not a readable folder: {0}")]
    NotADirectory(PathBuf),

    #[error("No photos or videos found under {0}")]
    NoMedia(PathBuf),
}

/// Result type for discovery.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Media found under one folder, each list sorted by path.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredMedia {
    pub photos: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    /// Entries that could not be read, or whose base name was taken.
    pub skipped: Vec<PathBuf>,
}

impl DiscoveredMedia {
    pub fn total(&self) -> usize {
        self.photos.len() + self.videos.len()
    }

    /// Turn the found media into a story request.
    pub fn into_request(self, event: impl Into<String>) -> StoryRequest {
        StoryRequest::new(self.photos, self.videos, event)
    }
}

/// Recursively collect photos and videos under `root`.
pub fn discover_media(root: &Path, settings: &DiscoverySettings) -> DiscoveryResult<DiscoveredMedia> {
    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let mut found = DiscoveredMedia::default();
    let mut photo_names = HashSet::new();
    let mut video_names = HashSet::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                tracing::warn!("Skipping {}: {}", path.display(), e);
                found.skipped.push(path);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = classify(entry.path(), settings) else {
            continue;
        };

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                found.skipped.push(entry.path().to_path_buf());
                continue;
            }
        };
        let Some(captured) = capture_time(&metadata, settings.timestamp_source) else {
            tracing::warn!("No timestamp for {}, skipping", entry.path().display());
            found.skipped.push(entry.path().to_path_buf());
            continue;
        };

        let item = MediaItem::new(entry.path(), captured, kind);
        let (taken, list) = match kind {
            MediaKind::Photo => (&mut photo_names, &mut found.photos),
            MediaKind::Video => (&mut video_names, &mut found.videos),
        };
        if !taken.insert(item.base_name().to_lowercase()) {
            tracing::warn!(
                "Skipping {}: another {} is already named {}",
                entry.path().display(),
                kind,
                item.base_name()
            );
            found.skipped.push(item.path);
            continue;
        }
        list.push(item);
    }

    if found.total() == 0 {
        return Err(DiscoveryError::NoMedia(root.to_path_buf()));
    }

    tracing::info!(
        "Found {} photo(s) and {} video(s) under {}",
        found.photos.len(),
        found.videos.len(),
        root.display()
    );
    Ok(found)
}

/// Media kind by case-insensitive extension.
pub fn classify(path: &Path, settings: &DiscoverySettings) -> Option<MediaKind> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let matches = |list: &[String]| list.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext));

    if matches(&settings.photo_extensions) {
        Some(MediaKind::Photo)
    } else if matches(&settings.video_extensions) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Capture time as local wall-clock time.
///
/// Creation time falls back to modification time where the platform or
/// filesystem does not record it.
pub fn capture_time(metadata: &Metadata, source: TimestampSource) -> Option<NaiveDateTime> {
    let time = match source {
        TimestampSource::Created => metadata.created().or_else(|_| metadata.modified()),
        TimestampSource::Modified => metadata.modified(),
    }
    .ok()?;
    Some(DateTime::<Local>::from(time).naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(items: &[MediaItem]) -> Vec<String> {
        items.iter().map(|i| i.file_name()).collect()
    }

    #[test]
    fn classifies_case_insensitively() {
        let settings = DiscoverySettings::default();
        assert_eq!(classify(Path::new("a/IMG_1.JPG"), &settings), Some(MediaKind::Photo));
        assert_eq!(classify(Path::new("a/IMG_1.jpeg"), &settings), Some(MediaKind::Photo));
        assert_eq!(classify(Path::new("a/00001.MTS"), &settings), Some(MediaKind::Video));
        assert_eq!(classify(Path::new("a/notes.txt"), &settings), None);
        assert_eq!(classify(Path::new("a/README"), &settings), None);
    }

    #[test]
    fn configured_extensions_may_carry_a_dot() {
        let settings = DiscoverySettings {
            video_extensions: vec![".MP4".to_string()],
            ..DiscoverySettings::default()
        };
        assert_eq!(classify(Path::new("clip.mp4"), &settings), Some(MediaKind::Video));
        assert_eq!(classify(Path::new("clip.mts"), &settings), None);
    }

    #[test]
    fn walks_subfolders_in_sorted_order() {
        let dir = tempdir().unwrap();
        let day2 = dir.path().join("day2");
        let day1 = dir.path().join("day1");
        fs::create_dir_all(&day2).unwrap();
        fs::create_dir_all(day1.join("AVCHD")).unwrap();
        fs::write(day2.join("IMG_0003.JPG"), b"x").unwrap();
        fs::write(day1.join("IMG_0002.jpg"), b"x").unwrap();
        fs::write(day1.join("IMG_0001.jpg"), b"x").unwrap();
        fs::write(day1.join("AVCHD").join("00001.MTS"), b"x").unwrap();
        fs::write(day1.join("thumbs.db"), b"x").unwrap();

        let found = discover_media(dir.path(), &DiscoverySettings::default()).unwrap();

        assert_eq!(names(&found.photos), vec!["IMG_0001.jpg", "IMG_0002.jpg", "IMG_0003.JPG"]);
        assert_eq!(names(&found.videos), vec!["00001.MTS"]);
        assert_eq!(found.total(), 4);
        assert!(found.skipped.is_empty());

        let request = found.into_request("Weekend");
        assert_eq!(request.total_items(), 4);
        assert_eq!(request.event, "Weekend");
    }

    #[test]
    fn timestamps_come_from_the_filesystem() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("IMG_1.jpg");
        fs::write(&path, b"x").unwrap();

        let settings = DiscoverySettings {
            timestamp_source: TimestampSource::Modified,
            ..DiscoverySettings::default()
        };
        let found = discover_media(dir.path(), &settings).unwrap();

        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        let expected = DateTime::<Local>::from(modified).naive_local();
        assert_eq!(found.photos[0].captured, expected);
    }

    #[test]
    fn folder_without_media_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let result = discover_media(dir.path(), &DiscoverySettings::default());
        assert!(matches!(result, Err(DiscoveryError::NoMedia(_))));
    }

    #[test]
    fn missing_folder_is_an_error() {
        let result = discover_media(Path::new("/nonexistent/card"), &DiscoverySettings::default());
        assert!(matches!(result, Err(DiscoveryError::NotADirectory(_))));
    }

    #[test]
    fn repeated_base_names_keep_the_first_file() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("DCIM").join("100CANON");
        let second = dir.path().join("DCIM").join("101CANON");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(first.join("IMG_0001.JPG"), b"x").unwrap();
        fs::write(first.join("IMG_0002.JPG"), b"x").unwrap();
        fs::write(second.join("IMG_0001.JPG"), b"x").unwrap();
        fs::write(second.join("img_0002.jpeg"), b"x").unwrap();
        fs::write(second.join("IMG_0003.JPG"), b"x").unwrap();
        // Same base name as a photo is fine for a video
        fs::write(second.join("IMG_0001.MTS"), b"x").unwrap();

        let found = discover_media(dir.path(), &DiscoverySettings::default()).unwrap();

        let bases: Vec<String> = found.photos.iter().map(|i| i.base_name()).collect();
        assert_eq!(bases, vec!["IMG_0001", "IMG_0002", "IMG_0003"]);
        assert!(found.photos[0].path.starts_with(&first));
        assert_eq!(names(&found.videos), vec!["IMG_0001.MTS"]);
        assert_eq!(
            found.skipped,
            vec![second.join("IMG_0001.JPG"), second.join("img_0002.jpeg")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subfolder_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("IMG_1.jpg"), b"x").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("IMG_2.jpg"), b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let found = discover_media(dir.path(), &DiscoverySettings::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Permission bits do not apply to a privileged user
        let found = found.unwrap();
        assert!(names(&found.photos).contains(&"IMG_1.jpg".to_string()));
        if found.photos.len() == 1 {
            assert_eq!(found.skipped, vec![locked]);
        }
    }
}
