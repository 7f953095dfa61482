//! Photos step - turns every photo into fade-in, hold and fade-out clips.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome};
use crate::transcode::{BatchReport, Transcoder};

pub struct PhotosStep;

impl PhotosStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhotosStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for PhotosStep {
    fn name(&self) -> &str {
        "Photos"
    }

    fn description(&self) -> &str {
        "Convert photos into faded clips"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.request.photos.is_empty() && !ctx.work_dir.pictures().is_dir() {
            return Err(StepError::invalid_input("Frame directory does not exist"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let photos = &ctx.request.photos;
        if photos.is_empty() {
            state.photos = Some(BatchReport::default());
            return Ok(StepOutcome::Skipped("No photos".to_string()));
        }

        let ffmpeg = state
            .ffmpeg
            .clone()
            .ok_or_else(|| StepError::precondition_failed("Encoder was not resolved"))?;

        let report = Transcoder::new(&ffmpeg, &ctx.work_dir, &ctx.logger, &ctx.progress)
            .hold_seconds(ctx.settings.photos.hold_seconds)
            .convert_photos(photos);

        if report.is_clean() {
            ctx.logger
                .info(&format!("Converted all {} photo(s)", photos.len()));
        } else {
            ctx.logger.warn(&format!(
                "Converted {} of {} photo(s), {} failed",
                report.converted.len(),
                photos.len(),
                report.failures.len()
            ));
        }

        state.photos = Some(report);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        let report = state
            .photos
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Photo results not recorded"))?;
        let accounted = report.converted.len() + report.failures.len();
        if accounted != ctx.request.photos.len() {
            return Err(StepError::invalid_output(format!(
                "{} photo(s) requested but {} accounted for",
                ctx.request.photos.len(),
                accounted
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoryRequest;
    use crate::orchestrator::types::test_context::context_in;
    use tempfile::tempdir;

    #[test]
    fn no_photos_is_skipped() {
        let dir = tempdir().unwrap();
        let ctx = context_in(dir.path(), StoryRequest::default());
        let mut state = JobState::new("job");

        let outcome = PhotosStep::new().execute(&ctx, &mut state).unwrap();
        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(state.photos.as_ref().unwrap().is_clean());
    }

    #[test]
    fn unresolved_encoder_is_a_precondition_failure() {
        use crate::models::MediaItem;
        use chrono::NaiveDate;

        let dir = tempdir().unwrap();
        let t = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let request = StoryRequest::new(vec![MediaItem::photo("/p/a.jpg", t)], Vec::new(), "");
        let ctx = context_in(dir.path(), request);
        let mut state = JobState::new("job");

        let err = PhotosStep::new().execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(err, StepError::PreconditionFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn records_converted_and_failed_photos() {
        use crate::models::MediaItem;
        use crate::test_support::{fake_tool, write_photo, TOUCHING_TOOL};
        use chrono::NaiveDate;

        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path(), TOUCHING_TOOL);
        let t = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let good = write_photo(dir.path(), "good.jpg");
        let bad = dir.path().join("bad.jpg");
        std::fs::write(&bad, b"not an image").unwrap();

        let request = StoryRequest::new(
            vec![MediaItem::photo(&good, t), MediaItem::photo(&bad, t)],
            Vec::new(),
            "",
        );
        let ctx = context_in(dir.path(), request);
        ctx.work_dir.ensure_layout().unwrap();
        let mut state = JobState::new("job");
        state.ffmpeg = Some(tool);
        let step = PhotosStep::new();

        assert_eq!(step.execute(&ctx, &mut state).unwrap(), StepOutcome::Success);
        step.validate_output(&ctx, &state).unwrap();

        let report = state.photos.as_ref().unwrap();
        assert_eq!(report.converted, vec![good]);
        assert_eq!(report.segments.len(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, bad);
        assert_eq!(ctx.progress.completed(), 2);
    }
}
