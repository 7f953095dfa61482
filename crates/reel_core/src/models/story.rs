//! The caller's request for one story video.

use serde::{Deserialize, Serialize};

use super::media::MediaItem;

/// Inputs for one story run: the enumerated media and a short event
/// description that ends up in the output file name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryRequest {
    /// Photos, in enumeration order.
    pub photos: Vec<MediaItem>,
    /// Videos, in enumeration order.
    pub videos: Vec<MediaItem>,
    /// Event description (e.g. "Summer holiday").
    pub event: String,
}

impl StoryRequest {
    /// Create a new request.
    pub fn new(photos: Vec<MediaItem>, videos: Vec<MediaItem>, event: impl Into<String>) -> Self {
        Self {
            photos,
            videos,
            event: event.into(),
        }
    }

    /// Number of items the run will process (the progress upper bound).
    pub fn total_items(&self) -> usize {
        self.photos.len() + self.videos.len()
    }

    /// Check if there is nothing to process.
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Event description collapsed onto one line.
    ///
    /// The description is written into the manifest comment, which must
    /// stay a single line.
    pub fn event_label(&self) -> String {
        self.event.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
