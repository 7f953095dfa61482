use std::path::PathBuf;

use crate::ffmpeg::{self, profile};
use crate::imaging::{compose_file, fade_sequence, FrameSet, FADE_IN_START, FADE_OUT_START};
use crate::models::{MediaItem, SegmentRole};

use super::{BatchReport, TranscodeError, TranscodeResult, Transcoder, WorkerPool};

impl Transcoder<'_> {
    /// Convert photos concurrently. Returns once every photo is done.
    pub fn convert_photos(&self, items: &[MediaItem]) -> BatchReport {
        let pool = WorkerPool::new(self.workers);
        self.logger.info(&format!(
            "Converting {} photo(s) on {} worker(s)",
            items.len(),
            pool.workers().min(items.len())
        ));

        let results = pool.run(items.iter().collect(), |index, item: &MediaItem| {
            self.progress.increment();
            self.logger.info(&format!(
                "Photo {}/{}: {}",
                index + 1,
                items.len(),
                item.file_name()
            ));
            let result = self.convert_photo(item);
            if let Err(ref e) = result {
                self.discard(item, e);
            }
            result
        });

        let mut report = BatchReport::default();
        for (item, slot) in items.iter().zip(results) {
            let result = slot.unwrap_or_else(|| {
                let e = TranscodeError::Panicked(item.path.clone());
                self.discard(item, &e);
                Err(e)
            });
            report.record(item, result);
        }
        report
    }

    /// Compose, write fade frames, then encode fade-out, hold and fade-in.
    ///
    /// The fade-in encode needs the relabelled frames, which in turn must
    /// wait until the fade-out encode has read them in their original
    /// order; every step here is therefore sequential.
    pub fn convert_photo(&self, item: &MediaItem) -> TranscodeResult<Vec<PathBuf>> {
        let base = item.base_name();
        let frames = FrameSet::new(self.work_dir.pictures(), &base);

        let composed = compose_file(&item.path)?;
        frames.write_base(&composed)?;
        frames.write_fades(fade_sequence(&composed))?;
        drop(composed);

        let silence = self.work_dir.silence();
        let pattern = frames.sequence_pattern();
        let fade_in = self.work_dir.segment(&SegmentRole::FadeIn.file_name(&base));
        let hold = self.work_dir.segment(&SegmentRole::Hold.file_name(&base));
        let fade_out = self.work_dir.segment(&SegmentRole::FadeOut.file_name(&base));

        ffmpeg::run(
            &profile::frame_sequence_clip(self.ffmpeg, &pattern, FADE_OUT_START, &silence, &fade_out),
            self.logger,
        )?;
        ffmpeg::run(
            &profile::still_hold_clip(
                self.ffmpeg,
                &frames.base_frame_path(),
                self.hold_seconds,
                &silence,
                &hold,
            ),
            self.logger,
        )?;

        frames.relabel_for_fade_in()?;
        ffmpeg::run(
            &profile::frame_sequence_clip(self.ffmpeg, &pattern, FADE_IN_START, &silence, &fade_in),
            self.logger,
        )?;

        tracing::debug!("Photo {} converted", item.path.display());
        Ok(vec![fade_in, hold, fade_out])
    }
}
