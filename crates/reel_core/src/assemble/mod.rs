//! Final assembly.
//!
//! The timeline is expanded into the segment files that actually exist,
//! written to the manifest, and joined by one stream-copy concatenation.
//! Segments missing because their item failed are left out silently.

mod manifest;

use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime};
use thiserror::Error;

use crate::ffmpeg::{self, profile, FfmpegError};
use crate::logging::{sanitize_filename, JobLogger};
use crate::models::{SegmentRole, SEGMENT_EXTENSION};
use crate::timeline::Timeline;
use crate::workdir::{WorkDir, MOVIES_DIR};

pub use manifest::Manifest;

/// Error type for assembly.
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("I/O error while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Ffmpeg(#[from] FfmpegError),

    /// The concatenation reported success but left no file behind.
    #[error("Concatenation produced no output at {0}")]
    MissingOutput(PathBuf),
}

/// Result type for assembly.
pub type AssembleResult<T> = Result<T, AssembleError>;

/// What assembly produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyOutcome {
    /// The story file, still inside the working directory.
    Assembled(PathBuf),
    /// Nothing to assemble.
    NoOutput,
}

impl AssemblyOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            AssemblyOutcome::Assembled(path) => Some(path),
            AssemblyOutcome::NoOutput => None,
        }
    }
}

/// `<year>-<event>.mpg`, the year taken from the first timeline entry.
pub fn output_file_name(earliest: NaiveDateTime, event: &str) -> String {
    let event = sanitize_filename(&event.split_whitespace().collect::<Vec<_>>().join(" "));
    if event.is_empty() {
        format!("{}.{}", earliest.year(), SEGMENT_EXTENSION)
    } else {
        format!("{}-{}.{}", earliest.year(), event, SEGMENT_EXTENSION)
    }
}

/// Builds the manifest and runs the concatenation.
pub struct Assembler<'a> {
    ffmpeg: &'a Path,
    work_dir: &'a WorkDir,
    logger: &'a JobLogger,
}

impl<'a> Assembler<'a> {
    pub fn new(ffmpeg: &'a Path, work_dir: &'a WorkDir, logger: &'a JobLogger) -> Self {
        Self {
            ffmpeg,
            work_dir,
            logger,
        }
    }

    /// Manifest for the segments of `timeline` that exist right now.
    pub fn build_manifest(&self, timeline: &Timeline, event: &str) -> Manifest {
        let date = timeline
            .earliest()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let mut manifest = Manifest::new(format!("{}, {}", date, event));

        for entry in timeline {
            let base = entry.base_name();
            for role in SegmentRole::for_kind(entry.kind()) {
                let name = role.file_name(&base);
                if self.work_dir.segment(&name).is_file() {
                    manifest.push(format!("{}/{}", MOVIES_DIR, name));
                } else {
                    self.logger
                        .debug(&format!("Segment {} missing, left out", name));
                }
            }
        }
        manifest
    }

    /// Assemble the story.
    ///
    /// An empty timeline returns [`AssemblyOutcome::NoOutput`] without
    /// touching the disk. A timeline whose segments are all missing still
    /// writes the (empty) manifest, then also returns `NoOutput`.
    pub fn assemble(&self, timeline: &Timeline, event: &str) -> AssembleResult<AssemblyOutcome> {
        let Some(earliest) = timeline.earliest() else {
            self.logger.info("Timeline is empty, nothing to assemble");
            return Ok(AssemblyOutcome::NoOutput);
        };

        let manifest = self.build_manifest(timeline, event);
        let manifest_path = self.work_dir.manifest();
        manifest.write(&manifest_path).map_err(|source| AssembleError::Io {
            operation: format!("writing {}", manifest_path.display()),
            source,
        })?;
        self.logger.info(&format!(
            "Manifest lists {} segment(s) for {} item(s)",
            manifest.len(),
            timeline.len()
        ));

        if manifest.is_empty() {
            self.logger.warn("No segments were produced, nothing to assemble");
            return Ok(AssemblyOutcome::NoOutput);
        }

        let output = self
            .work_dir
            .root()
            .join(output_file_name(earliest, event));
        let command = profile::concat(self.ffmpeg, &manifest_path, &output)
            .current_dir(self.work_dir.root());
        ffmpeg::run(&command, self.logger)?;

        if !output.is_file() {
            return Err(AssembleError::MissingOutput(output));
        }

        self.logger
            .success(&format!("Assembled {}", output.display()));
        Ok(AssemblyOutcome::Assembled(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogConfig;
    use crate::models::MediaItem;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn setup() -> (tempfile::TempDir, WorkDir, JobLogger) {
        let dir = tempdir().unwrap();
        let work = WorkDir::create_unique(&dir.path().join("work")).unwrap();
        work.ensure_layout().unwrap();
        let logger = JobLogger::new("assemble", dir.path(), LogConfig::default(), None).unwrap();
        (dir, work, logger)
    }

    fn touch(work: &WorkDir, name: &str) {
        fs::write(work.segment(name), b"segment").unwrap();
    }

    #[test]
    fn output_name_uses_year_and_event() {
        assert_eq!(output_file_name(at(10, 0), "Summer holiday"), "2024-Summer holiday.mpg");
        assert_eq!(output_file_name(at(10, 0), "a/b: c"), "2024-a_b_ c.mpg");
        assert_eq!(output_file_name(at(10, 0), "  "), "2024.mpg");
    }

    #[test]
    fn manifest_lists_existing_segments_in_timeline_order() {
        let (_dir, work, logger) = setup();
        touch(&work, "clip.mpg");
        touch(&work, "A_0.mpg");
        touch(&work, "A_1.mpg");
        touch(&work, "A_2.mpg");
        // B lost its hold clip; C produced nothing
        touch(&work, "B_0.mpg");
        touch(&work, "B_2.mpg");

        let timeline = Timeline::build(
            &[
                MediaItem::photo("/p/A.jpg", at(10, 0)),
                MediaItem::photo("/p/B.jpg", at(10, 0)),
                MediaItem::photo("/p/C.jpg", at(11, 0)),
            ],
            &[MediaItem::video("/v/clip.mts", at(9, 59))],
        );

        let assembler = Assembler::new(Path::new("ffmpeg"), &work, &logger);
        let manifest = assembler.build_manifest(&timeline, "Trip");

        assert_eq!(manifest.comment(), "2024-05-01, Trip");
        assert_eq!(
            manifest.entries(),
            &[
                "movies/clip.mpg",
                "movies/A_0.mpg",
                "movies/A_1.mpg",
                "movies/A_2.mpg",
                "movies/B_0.mpg",
                "movies/B_2.mpg",
            ]
        );
        for entry in manifest.entries() {
            assert!(work.root().join(entry).exists());
        }
    }

    #[test]
    fn empty_timeline_is_no_output() {
        let (_dir, work, logger) = setup();
        let assembler = Assembler::new(Path::new("ffmpeg-not-needed"), &work, &logger);

        let outcome = assembler.assemble(&Timeline::default(), "Trip").unwrap();

        assert_eq!(outcome, AssemblyOutcome::NoOutput);
        assert!(!work.manifest().exists());
    }

    #[test]
    fn no_segments_is_no_output() {
        let (_dir, work, logger) = setup();
        let timeline = Timeline::build(&[MediaItem::photo("/p/gone.jpg", at(10, 0))], &[]);
        let assembler = Assembler::new(Path::new("ffmpeg-not-needed"), &work, &logger);

        let outcome = assembler.assemble(&timeline, "Trip").unwrap();

        assert_eq!(outcome, AssemblyOutcome::NoOutput);
        assert!(work.manifest().exists());
    }

    #[cfg(unix)]
    #[test]
    fn concatenates_into_year_event_file() {
        use crate::test_support::{fake_tool, TOUCHING_TOOL};

        let (dir, work, logger) = setup();
        let tool = fake_tool(dir.path(), TOUCHING_TOOL);
        touch(&work, "clip.mpg");
        let timeline = Timeline::build(&[], &[MediaItem::video("/v/clip.mts", at(9, 59))]);

        let outcome = Assembler::new(&tool, &work, &logger)
            .assemble(&timeline, "Trip")
            .unwrap();

        let expected = work.root().join("2024-Trip.mpg");
        assert_eq!(outcome.path(), Some(expected.as_path()));
        assert!(expected.exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_concat_is_an_error() {
        use crate::test_support::{fake_tool, FAILING_TOOL};

        let (dir, work, logger) = setup();
        let tool = fake_tool(dir.path(), FAILING_TOOL);
        touch(&work, "clip.mpg");
        let timeline = Timeline::build(&[], &[MediaItem::video("/v/clip.mts", at(9, 59))]);

        let result = Assembler::new(&tool, &work, &logger).assemble(&timeline, "Trip");
        assert!(matches!(result, Err(AssembleError::Ffmpeg(_))));
    }
}
