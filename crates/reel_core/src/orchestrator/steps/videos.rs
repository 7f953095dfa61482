//! Videos step - re-encodes camera clips to the story profile.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome};
use crate::transcode::{BatchReport, Transcoder};

pub struct VideosStep;

impl VideosStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VideosStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for VideosStep {
    fn name(&self) -> &str {
        "Videos"
    }

    fn description(&self) -> &str {
        "Re-encode videos with two passes"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.request.videos.is_empty() && !ctx.work_dir.movies().is_dir() {
            return Err(StepError::invalid_input("Segment directory does not exist"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let videos = &ctx.request.videos;
        if videos.is_empty() {
            state.videos = Some(BatchReport::default());
            return Ok(StepOutcome::Skipped("No videos".to_string()));
        }

        let ffmpeg = state
            .ffmpeg
            .clone()
            .ok_or_else(|| StepError::precondition_failed("Encoder was not resolved"))?;

        let report = Transcoder::new(&ffmpeg, &ctx.work_dir, &ctx.logger, &ctx.progress)
            .convert_videos(videos);

        if !report.is_clean() {
            ctx.logger.warn(&format!(
                "{} of {} video(s) failed",
                report.failures.len(),
                videos.len()
            ));
        }

        state.videos = Some(report);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        let report = state
            .videos
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Video results not recorded"))?;
        if report.converted.len() + report.failures.len() != ctx.request.videos.len() {
            return Err(StepError::invalid_output("Not every video was accounted for"));
        }
        Ok(())
    }
}
