//! Numbered frame files in the `pictures/` directory.
//!
//! For a photo with base name `B` the directory holds:
//!
//! ```text
//! B_0.jpg          composed base frame
//! B_1.jpg .. B_12  fade frames, lightest to darkest
//! ```
//!
//! The fade-out clip reads frames 1..12 in ascending order. Afterwards
//! the fade frames are relabelled so that reading upward from 12 plays
//! them darkest first: frame `n` becomes `2 * 12 - n`, i.e. 1 → 23,
//! 2 → 22, …, 11 → 13, while 12 keeps its number. The frame-sequence
//! reader stops at the first gap, so each clip picks up exactly twelve
//! frames.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use super::fade::FADE_STEPS;
use super::{ImagingError, ImagingResult};

/// Extension of intermediate frame files.
pub const FRAME_EXTENSION: &str = "jpg";

/// First frame number read for the fade-out clip.
pub const FADE_OUT_START: usize = 1;

/// First frame number read for the fade-in clip (after relabelling).
pub const FADE_IN_START: usize = FADE_STEPS;

const JPEG_QUALITY: u8 = 95;

/// Frame number a fade frame receives in the fade-in ordering.
pub fn fade_in_label(number: usize) -> usize {
    2 * FADE_STEPS - number
}

/// Escape `%` so a base name can sit inside an image-sequence pattern.
pub fn escape_pattern(base_name: &str) -> String {
    base_name.replace('%', "%%")
}

/// The frame files belonging to one photo.
#[derive(Debug, Clone)]
pub struct FrameSet {
    dir: PathBuf,
    base_name: String,
}

impl FrameSet {
    /// Frame set for `base_name` inside `dir`.
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
        }
    }

    /// Path of frame number `number`.
    pub fn frame_path(&self, number: usize) -> PathBuf {
        self.dir
            .join(format!("{}_{}.{}", self.base_name, number, FRAME_EXTENSION))
    }

    /// Path of the composed base frame (number 0).
    pub fn base_frame_path(&self) -> PathBuf {
        self.frame_path(0)
    }

    /// Image-sequence pattern matching every numbered frame (`B_%d.jpg`).
    pub fn sequence_pattern(&self) -> PathBuf {
        self.dir.join(format!(
            "{}_%d.{}",
            escape_pattern(&self.base_name),
            FRAME_EXTENSION
        ))
    }

    /// Write the composed base frame.
    pub fn write_base(&self, frame: &RgbImage) -> ImagingResult<PathBuf> {
        let path = self.base_frame_path();
        write_jpeg(frame, &path)?;
        Ok(path)
    }

    /// Write fade frames as numbers 1..=N in sequence order.
    ///
    /// Each frame is dropped once written.
    pub fn write_fades(
        &self,
        frames: impl IntoIterator<Item = RgbImage>,
    ) -> ImagingResult<Vec<PathBuf>> {
        frames
            .into_iter()
            .enumerate()
            .map(|(i, frame)| {
                let path = self.frame_path(i + 1);
                write_jpeg(&frame, &path)?;
                Ok(path)
            })
            .collect()
    }

    /// Renumber fade frames 1..=N for the fade-in clip.
    ///
    /// Targets 13..=23 never collide with sources 1..=11, so renaming in
    /// ascending order is safe.
    pub fn relabel_for_fade_in(&self) -> ImagingResult<()> {
        for number in 1..=FADE_STEPS {
            let target = fade_in_label(number);
            if target == number {
                continue;
            }
            let from = self.frame_path(number);
            let to = self.frame_path(target);
            fs::rename(&from, &to).map_err(|e| {
                ImagingError::io(
                    format!("renaming {} to {}", from.display(), to.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

/// Encode a frame as baseline JPEG.
fn write_jpeg(frame: &RgbImage, path: &Path) -> ImagingResult<()> {
    let file = File::create(path)
        .map_err(|e| ImagingError::io(format!("creating {}", path.display()), e))?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
    frame
        .write_with_encoder(encoder)
        .map_err(|e| ImagingError::encode(path, e))
}
