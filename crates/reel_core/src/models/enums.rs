//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Kind of source media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still photograph.
    Photo,
    /// Camcorder clip.
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "photo"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Which filesystem time stands in for the capture timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampSource {
    /// File creation time, falling back to modification time when the
    /// platform does not record creation.
    #[default]
    Created,
    /// File modification time.
    Modified,
}

impl std::fmt::Display for TimestampSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampSource::Created => write!(f, "created"),
            TimestampSource::Modified => write!(f, "modified"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MediaKind::Photo).unwrap();
        assert_eq!(json, "\"photo\"");
        let parsed: MediaKind = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(parsed, MediaKind::Video);
    }

    #[test]
    fn timestamp_source_defaults_to_created() {
        assert_eq!(TimestampSource::default(), TimestampSource::Created);
        assert_eq!(TimestampSource::Modified.to_string(), "modified");
    }
}
