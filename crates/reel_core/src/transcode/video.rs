use std::path::PathBuf;

use crate::ffmpeg::profile::{self, Pass};
use crate::ffmpeg::{self, null_device};
use crate::models::{MediaItem, SegmentRole};

use super::{BatchReport, TranscodeResult, Transcoder};

impl Transcoder<'_> {
    /// Re-encode videos one after another on the calling thread.
    pub fn convert_videos(&self, items: &[MediaItem]) -> BatchReport {
        self.logger
            .info(&format!("Converting {} video(s)", items.len()));

        let mut report = BatchReport::default();
        for (index, item) in items.iter().enumerate() {
            self.progress.increment();
            self.logger.info(&format!(
                "Video {}/{}: {}",
                index + 1,
                items.len(),
                item.file_name()
            ));

            let result = self.convert_video(item).map(|segment| vec![segment]);
            if let Err(ref e) = result {
                self.discard(item, e);
            }
            report.record(item, result);
        }
        report
    }

    /// Two-pass re-encode of one clip into `movies/<base>.mpg`.
    pub fn convert_video(&self, item: &MediaItem) -> TranscodeResult<PathBuf> {
        let base = item.base_name();
        let output = self.work_dir.segment(&SegmentRole::Clip.file_name(&base));
        let passlog = self.work_dir.passlog(&base);

        for (pass, target) in [
            (Pass::First, null_device().to_path_buf()),
            (Pass::Second, output.clone()),
        ] {
            let command = profile::video_pass(self.ffmpeg, &item.path, pass, &passlog, &target)
                .current_dir(self.work_dir.root());
            ffmpeg::run(&command, self.logger)?;
        }

        tracing::debug!("Video {} converted", item.path.display());
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::logging::{JobLogger, LogConfig};
    use crate::progress::ProgressTracker;
    use crate::test_support::{fake_tool, FAILING_TOOL, TOUCHING_TOOL};
    use crate::workdir::WorkDir;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn clip(name: &str) -> MediaItem {
        let t = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 59, 0)
            .unwrap();
        MediaItem::video(format!("/card/PRIVATE/AVCHD/{}", name), t)
    }

    #[test]
    fn videos_become_unsuffixed_segments() {
        let dir = tempdir().unwrap();
        let work = WorkDir::create_unique(&dir.path().join("work")).unwrap();
        work.ensure_layout().unwrap();
        let tool = fake_tool(dir.path(), TOUCHING_TOOL);
        let logger = JobLogger::new("videos", dir.path(), LogConfig::default(), None).unwrap();
        let progress = ProgressTracker::new();
        progress.set_total(2);

        let report = Transcoder::new(&tool, &work, &logger, &progress)
            .convert_videos(&[clip("00001.MTS"), clip("00002.MTS")]);

        assert!(report.is_clean());
        assert_eq!(progress.completed(), 2);
        assert_eq!(
            report.segments,
            vec![work.segment("00001.mpg"), work.segment("00002.mpg")]
        );
        assert!(work.segment("00002.mpg").exists());
    }

    #[test]
    fn failed_video_counts_progress_and_is_reported() {
        let dir = tempdir().unwrap();
        let work = WorkDir::create_unique(&dir.path().join("work")).unwrap();
        work.ensure_layout().unwrap();
        let tool = fake_tool(dir.path(), FAILING_TOOL);
        let logger = JobLogger::new("videos", dir.path(), LogConfig::default(), None).unwrap();
        let progress = ProgressTracker::new();

        let report =
            Transcoder::new(&tool, &work, &logger, &progress).convert_videos(&[clip("00003.MTS")]);

        assert_eq!(progress.completed(), 1);
        assert!(report.converted.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(!work.segment("00003.mpg").exists());
    }
}
