//! Segment naming.
//!
//! A segment is one finished, fixed-profile clip in the `movies/`
//! directory. Its file name is derived purely from the source item's
//! base name plus its role, so the assembler can find it again without
//! any bookkeeping from the transcoder.

use serde::{Deserialize, Serialize};

use super::enums::MediaKind;

/// File extension of every generated segment and of the final output.
pub const SEGMENT_EXTENSION: &str = "mpg";

/// Role a segment plays for its source item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentRole {
    /// Photo fading in from black (`_0`).
    FadeIn,
    /// Photo held steady (`_1`).
    Hold,
    /// Photo fading out to black (`_2`).
    FadeOut,
    /// Re-encoded video clip (no suffix).
    Clip,
}

/// Photo segment roles in playback order.
const PHOTO_ROLES: [SegmentRole; 3] = [SegmentRole::FadeIn, SegmentRole::Hold, SegmentRole::FadeOut];

/// Video segment roles in playback order.
const VIDEO_ROLES: [SegmentRole; 1] = [SegmentRole::Clip];

impl SegmentRole {
    /// Suffix appended to the base name.
    pub fn suffix(&self) -> &'static str {
        match self {
            SegmentRole::FadeIn => "_0",
            SegmentRole::Hold => "_1",
            SegmentRole::FadeOut => "_2",
            SegmentRole::Clip => "",
        }
    }

    /// Roles generated for a media kind, in playback order.
    pub fn for_kind(kind: MediaKind) -> &'static [SegmentRole] {
        match kind {
            MediaKind::Photo => &PHOTO_ROLES,
            MediaKind::Video => &VIDEO_ROLES,
        }
    }

    /// Segment file name for a base name (e.g. `IMG_0001_1.mpg`).
    pub fn file_name(&self, base_name: &str) -> String {
        format!("{}{}.{}", base_name, self.suffix(), SEGMENT_EXTENSION)
    }
}

impl std::fmt::Display for SegmentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentRole::FadeIn => write!(f, "fade-in"),
            SegmentRole::Hold => write!(f, "hold"),
            SegmentRole::FadeOut => write!(f, "fade-out"),
            SegmentRole::Clip => write!(f, "clip"),
        }
    }
}

/// All candidate segment file names for an item, in playback order.
pub fn segment_file_names(base_name: &str, kind: MediaKind) -> Vec<String> {
    SegmentRole::for_kind(kind)
        .iter()
        .map(|role| role.file_name(base_name))
        .collect()
}
