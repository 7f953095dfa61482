//! Data models shared across the pipeline.
//!
//! - Enums for media kinds and timestamp sources
//! - Media items as enumerated by discovery
//! - Segment naming rules
//! - The story request handed in by the caller

mod enums;
mod media;
mod segment;
mod story;

pub use enums::{MediaKind, TimestampSource};
pub use media::{base_name_of, MediaItem};
pub use segment::{segment_file_names, SegmentRole, SEGMENT_EXTENSION};
pub use story::StoryRequest;
