//! Concat-demuxer manifest.
//!
//! ```text
//! # 2024-05-01, Summer holiday
//! file movies/IMG_0001_0.mpg
//! file movies/IMG_0001_1.mpg
//! file 'movies/Dad'\''s boat.mpg'
//! ```
//!
//! Entries are relative to the manifest's own directory, which is how the
//! demuxer resolves them.

use std::fs;
use std::io;
use std::path::Path;

/// Ordered list of segment references plus one comment line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    comment: String,
    entries: Vec<String>,
}

impl Manifest {
    /// Empty manifest headed by `comment` (collapsed onto one line).
    pub fn new(comment: impl AsRef<str>) -> Self {
        Self {
            comment: comment
                .as_ref()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
            entries: Vec::new(),
        }
    }

    /// Append a segment path relative to the manifest directory.
    pub fn push(&mut self, relative: impl Into<String>) {
        self.entries.push(relative.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Check whether no segment is referenced.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Manifest text, one directive per line.
    pub fn render(&self) -> String {
        let mut out = format!("# {}\n", self.comment);
        for entry in &self.entries {
            out.push_str("file ");
            out.push_str(&quote_entry(entry));
            out.push('\n');
        }
        out
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.render())
    }
}

/// Quote an entry for the demuxer when it holds anything beyond plain
/// path characters.
fn quote_entry(entry: &str) -> String {
    let plain = entry
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-'));
    if plain {
        entry.to_string()
    } else {
        format!("'{}'", entry.replace('\'', "'\\''"))
    }
}
