//! Source media references.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::MediaKind;

/// A photo or video file picked up by discovery.
///
/// Immutable once enumerated; the pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Path to the source file.
    pub path: PathBuf,
    /// Capture timestamp (local wall-clock time).
    pub captured: NaiveDateTime,
    /// Photo or video.
    pub kind: MediaKind,
}

impl MediaItem {
    /// Create a new media item.
    pub fn new(path: impl Into<PathBuf>, captured: NaiveDateTime, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            captured,
            kind,
        }
    }

    /// Create a photo item.
    pub fn photo(path: impl Into<PathBuf>, captured: NaiveDateTime) -> Self {
        Self::new(path, captured, MediaKind::Photo)
    }

    /// Create a video item.
    pub fn video(path: impl Into<PathBuf>, captured: NaiveDateTime) -> Self {
        Self::new(path, captured, MediaKind::Video)
    }

    /// File name including extension (e.g. `IMG_0001.JPG`).
    ///
    /// Used as the tie-break key when several items share a timestamp.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// File name without extension (e.g. `IMG_0001`).
    ///
    /// Every generated frame and segment is named from this.
    pub fn base_name(&self) -> String {
        base_name_of(&self.path)
    }

    /// Check whether this item is a photo.
    pub fn is_photo(&self) -> bool {
        self.kind == MediaKind::Photo
    }
}

/// Base name of a path: the final component without its last extension.
pub fn base_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
