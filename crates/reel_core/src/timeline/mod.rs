//! Chronological ordering of photos and videos.
//!
//! Each list is grouped by capture timestamp; within a group items are
//! ordered by file name and spaced one millisecond apart, so every entry
//! gets a distinct key. The two lists are then merged by key, photos
//! first when a photo and a video land on the same instant.

mod builder;

pub use builder::{build_timeline, TIE_BREAK_STEP_MS};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{MediaItem, MediaKind};

/// One item at its position in the story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Ordering key: the capture timestamp plus any tie-break offset.
    pub key: NaiveDateTime,
    pub item: MediaItem,
}

impl TimelineEntry {
    pub fn base_name(&self) -> String {
        self.item.base_name()
    }

    pub fn kind(&self) -> MediaKind {
        self.item.kind
    }
}

/// The ordered story. Keys are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Order photos and videos into one timeline.
    pub fn build(photos: &[MediaItem], videos: &[MediaItem]) -> Self {
        build_timeline(photos, videos)
    }

    pub(crate) fn from_entries(entries: Vec<TimelineEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key of the first entry; it dates the story.
    pub fn earliest(&self) -> Option<NaiveDateTime> {
        self.entries.first().map(|e| e.key)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEntry;
    type IntoIter = std::slice::Iter<'a, TimelineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
