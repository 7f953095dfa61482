//! Still-image processing for photo segments.
//!
//! - **compositor**: orientation-corrected, black-boxed 1080-line canvas
//! - **fade**: progressively darkened copies of a composed frame
//! - **frames**: numbered frame files on disk and the fade-in relabel
//!
//! Everything here runs synchronously inside a photo worker.

mod compositor;
mod fade;
mod frames;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use compositor::{compose, compose_file, load_oriented, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use fade::{darken, fade_sequence, FADE_DARKEN_PERCENT, FADE_STEPS};
pub use frames::{
    escape_pattern, fade_in_label, FrameSet, FADE_IN_START, FADE_OUT_START, FRAME_EXTENSION,
};

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum ImagingError {
    /// The source image could not be opened or decoded.
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A frame could not be encoded or written.
    #[error("Failed to write frame {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// File I/O error.
    #[error("I/O error while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl ImagingError {
    /// Create a decode error.
    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Create an encode error.
    pub fn encode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Encode {
            path: path.into(),
            source,
        }
    }

    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for image operations.
pub type ImagingResult<T> = Result<T, ImagingError>;
