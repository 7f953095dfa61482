//! Prepare step - resolves the encoder and lays out the working directory.
//!
//! Also puts the silent audio track in place that every photo clip
//! carries: a configured asset is copied, otherwise one is generated.

use std::fs;
use std::path::Path;

use crate::ffmpeg::{self, profile};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome};

/// Seconds of silence beyond the hold clip, so `-shortest` always cuts
/// on the video stream.
const SILENCE_MARGIN_SECS: u32 = 1;

pub struct PrepareStep;

impl PrepareStep {
    pub fn new() -> Self {
        Self
    }

    fn install_silence(&self, ctx: &Context, ffmpeg: &Path) -> StepResult<()> {
        let target = ctx.work_dir.silence();

        if let Some(asset) = ctx.settings.photos.silence_asset_path() {
            ctx.logger
                .info(&format!("Copying silence track from {}", asset.display()));
            fs::copy(&asset, &target).map_err(|e| {
                StepError::io_error(format!("copying silence asset {}", asset.display()), e)
            })?;
            return Ok(());
        }

        let seconds = ctx.settings.photos.hold_seconds + SILENCE_MARGIN_SECS;
        ctx.logger
            .info(&format!("Generating {}s silence track", seconds));
        ffmpeg::run(&profile::silence(ffmpeg, seconds, &target), &ctx.logger)?;
        Ok(())
    }
}

impl Default for PrepareStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for PrepareStep {
    fn name(&self) -> &str {
        "Prepare"
    }

    fn description(&self) -> &str {
        "Locate ffmpeg and prepare the working directory"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.settings.photos.hold_seconds == 0 {
            return Err(StepError::invalid_input("hold_seconds must be at least 1"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let ffmpeg = ffmpeg::locate(&ctx.settings.tools.ffmpeg)?;
        ctx.logger.info(&format!("Using {}", ffmpeg.display()));

        ctx.work_dir.ensure_layout()?;
        ctx.logger
            .info(&format!("Working directory: {}", ctx.work_dir.root().display()));

        if ctx.request.photos.is_empty() {
            ctx.logger.debug("No photos, silence track not needed");
        } else {
            self.install_silence(ctx, &ffmpeg)?;
        }

        state.ffmpeg = Some(ffmpeg);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.ffmpeg.is_none() {
            return Err(StepError::invalid_output("Encoder path not recorded"));
        }
        for dir in [ctx.work_dir.pictures(), ctx.work_dir.movies()] {
            if !dir.is_dir() {
                return Err(StepError::invalid_output(format!(
                    "Missing directory {}",
                    dir.display()
                )));
            }
        }
        if !ctx.request.photos.is_empty() && !ctx.work_dir.silence().is_file() {
            return Err(StepError::invalid_output("Silence track was not created"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{MediaItem, StoryRequest};
    use crate::orchestrator::types::test_context::context_with;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn one_photo() -> StoryRequest {
        let t = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        StoryRequest::new(vec![MediaItem::photo("/p/a.jpg", t)], Vec::new(), "Trip")
    }

    #[test]
    fn missing_encoder_is_fatal() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.tools.ffmpeg = "/nonexistent/bin/ffmpeg".to_string();
        let ctx = context_with(dir.path(), one_photo(), settings);
        let mut state = JobState::new("job");

        let err = PrepareStep::new().execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(err, StepError::Ffmpeg(_)));
        assert!(state.ffmpeg.is_none());
    }

    #[test]
    fn zero_hold_is_rejected() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.photos.hold_seconds = 0;
        let ctx = context_with(dir.path(), one_photo(), settings);

        assert!(matches!(
            PrepareStep::new().validate_input(&ctx),
            Err(StepError::InvalidInput(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn copies_configured_silence_asset() {
        use crate::test_support::{fake_tool, FAILING_TOOL};

        let dir = tempdir().unwrap();
        // The encoder must not be needed when an asset is configured
        let tool = fake_tool(dir.path(), FAILING_TOOL);
        let asset = dir.path().join("silence.ac3");
        fs::write(&asset, b"ac3").unwrap();

        let mut settings = Settings::default();
        settings.tools.ffmpeg = tool.to_string_lossy().into_owned();
        settings.photos.silence_asset = asset.to_string_lossy().into_owned();
        let ctx = context_with(dir.path(), one_photo(), settings);
        let mut state = JobState::new("job");
        let step = PrepareStep::new();

        assert_eq!(step.execute(&ctx, &mut state).unwrap(), StepOutcome::Success);
        step.validate_output(&ctx, &state).unwrap();
        assert_eq!(fs::read(ctx.work_dir.silence()).unwrap(), b"ac3");
        assert!(state.ffmpeg().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn generates_silence_with_the_encoder() {
        use crate::test_support::{fake_tool, TOUCHING_TOOL};

        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path(), TOUCHING_TOOL);
        let mut settings = Settings::default();
        settings.tools.ffmpeg = tool.to_string_lossy().into_owned();
        let ctx = context_with(dir.path(), one_photo(), settings);
        let mut state = JobState::new("job");
        let step = PrepareStep::new();

        step.execute(&ctx, &mut state).unwrap();
        step.validate_output(&ctx, &state).unwrap();
        assert!(ctx.work_dir.silence().is_file());
        assert!(ctx.work_dir.pictures().is_dir());
        assert!(ctx.work_dir.movies().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn videos_only_skip_the_silence_track() {
        use crate::test_support::{fake_tool, FAILING_TOOL};

        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path(), FAILING_TOOL);
        let mut settings = Settings::default();
        settings.tools.ffmpeg = tool.to_string_lossy().into_owned();
        let ctx = context_with(dir.path(), StoryRequest::default(), settings);
        let mut state = JobState::new("job");

        PrepareStep::new().execute(&ctx, &mut state).unwrap();
        assert!(!ctx.work_dir.silence().exists());
    }
}
