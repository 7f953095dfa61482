//! Conversion of source media into standard-profile segments.
//!
//! Photos run on a [`WorkerPool`] of [`PHOTO_WORKERS`] threads, each
//! taking one photo through compose, fade frames and its three encodes
//! before pulling the next. Videos are re-encoded one after another on
//! the calling thread. A failed item is logged, its partial segments are
//! removed, and the batch carries on.

mod photo;
mod pool;
mod video;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ffmpeg::FfmpegError;
use crate::imaging::ImagingError;
use crate::logging::JobLogger;
use crate::models::{MediaItem, MediaKind, SegmentRole};
use crate::progress::ProgressTracker;
use crate::workdir::WorkDir;

pub use pool::WorkerPool;

/// Concurrent photo conversions.
pub const PHOTO_WORKERS: usize = 4;

/// Error converting a single item.
#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error(transparent)]
    Imaging(#[from] ImagingError),

    #[error(transparent)]
    Ffmpeg(#[from] FfmpegError),

    /// The conversion panicked; its worker carried on with other items.
    #[error("Conversion of {0} panicked")]
    Panicked(PathBuf),
}

/// Result type for single-item conversions.
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// An item that produced no segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub message: String,
}

/// Outcome of converting one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Source items converted in full.
    pub converted: Vec<PathBuf>,
    /// Segment files written, in item order.
    pub segments: Vec<PathBuf>,
    /// Items that failed.
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    /// Check whether every item converted.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, item: &MediaItem, result: TranscodeResult<Vec<PathBuf>>) {
        match result {
            Ok(segments) => {
                self.converted.push(item.path.clone());
                self.segments.extend(segments);
            }
            Err(e) => self.failures.push(ItemFailure {
                path: item.path.clone(),
                kind: item.kind,
                message: e.to_string(),
            }),
        }
    }
}

/// Converts media items into segments inside a working directory.
pub struct Transcoder<'a> {
    ffmpeg: &'a Path,
    work_dir: &'a WorkDir,
    logger: &'a JobLogger,
    progress: &'a ProgressTracker,
    hold_seconds: u32,
    workers: usize,
}

impl<'a> Transcoder<'a> {
    pub fn new(
        ffmpeg: &'a Path,
        work_dir: &'a WorkDir,
        logger: &'a JobLogger,
        progress: &'a ProgressTracker,
    ) -> Self {
        Self {
            ffmpeg,
            work_dir,
            logger,
            progress,
            hold_seconds: 4,
            workers: PHOTO_WORKERS,
        }
    }

    /// Length of the steady hold clip.
    pub fn hold_seconds(mut self, seconds: u32) -> Self {
        self.hold_seconds = seconds;
        self
    }

    /// Photo worker count.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Log a failed item and delete whatever segments it left behind.
    fn discard(&self, item: &MediaItem, error: &TranscodeError) {
        self.logger.error(&format!(
            "{} {} failed: {}",
            item.kind,
            item.file_name(),
            error
        ));
        let base = item.base_name();
        for role in SegmentRole::for_kind(item.kind) {
            let partial = self.work_dir.segment(&role.file_name(&base));
            if partial.exists() {
                if let Err(e) = fs::remove_file(&partial) {
                    tracing::warn!("Could not remove {}: {}", partial.display(), e);
                }
            }
        }
    }
}
