//! The stage interface of a story run.
//!
//! A run is Prepare, Photos, Videos, Timeline and Assemble, in that
//! order. Each stage reads the request and settings from [`Context`] and
//! leaves what it produced (located ffmpeg, batch reports, the timeline,
//! the assembled file) in [`JobState`] for the stages after it.

use super::errors::StepResult;
use super::types::{Context, JobState, StepOutcome};

/// One stage of a story run.
///
/// [`Pipeline`](super::Pipeline) drives every stage through
/// `validate_input`, `execute` and, when the stage did not skip itself,
/// `validate_output`. An error from any of them stops the run; the
/// failed-run policy then decides what happens to the working directory.
///
/// Per-item failures (a photo that will not decode, a clip ffmpeg
/// rejects) are not errors here. Conversion stages record them in their
/// batch report and return `Success`.
///
/// ```ignore
/// struct TimelineStep;
///
/// impl PipelineStep for TimelineStep {
///     fn name(&self) -> &str { "Timeline" }
///
///     fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
///         Ok(())
///     }
///
///     fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
///         state.timeline = Some(Timeline::build(&ctx.request.photos, &ctx.request.videos));
///         Ok(StepOutcome::Success)
///     }
///
///     fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
///         state.timeline.as_ref().map(|_| ()).ok_or_else(|| StepError::invalid_output("no timeline"))
///     }
/// }
/// ```
pub trait PipelineStep: Send + Sync {
    /// Short stage name, used as the log phase header.
    fn name(&self) -> &str;

    /// Check what the stage needs before any work starts, such as an
    /// ffmpeg located by Prepare or a timeline left by an earlier stage.
    fn validate_input(&self, ctx: &Context) -> StepResult<()>;

    /// Do the stage's work and record it in `state`.
    ///
    /// A stage with nothing to do (no photos, say) returns
    /// `StepOutcome::Skipped` with the reason.
    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome>;

    /// Check what `execute` left behind: reports recorded, files on disk.
    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()>;

    /// One line shown with step progress. Defaults to the name.
    fn description(&self) -> &str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaItem, StoryRequest};
    use crate::orchestrator::steps::TimelineStep;
    use crate::orchestrator::types::test_context::context_in;
    use chrono::NaiveDate;

    /// Stage that only ever skips.
    struct NoVideos;

    impl PipelineStep for NoVideos {
        fn name(&self) -> &str {
            "Videos"
        }

        fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut JobState) -> StepResult<StepOutcome> {
            Ok(StepOutcome::Skipped("no videos".to_string()))
        }

        fn validate_output(&self, _ctx: &Context, _state: &JobState) -> StepResult<()> {
            Ok(())
        }
    }

    #[test]
    fn description_defaults_to_name() {
        let step: Box<dyn PipelineStep> = Box::new(NoVideos);
        assert_eq!(step.name(), "Videos");
        assert_eq!(step.description(), "Videos");

        let timeline: Box<dyn PipelineStep> = Box::new(TimelineStep::new());
        assert_ne!(timeline.description(), timeline.name());
    }

    #[test]
    fn skipping_stage_reports_its_reason() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path(), StoryRequest::default());
        let mut state = JobState::new("job");

        assert_eq!(
            NoVideos.execute(&ctx, &mut state).unwrap(),
            StepOutcome::Skipped("no videos".to_string())
        );
    }

    #[test]
    fn stage_output_is_checked_against_state() {
        let dir = tempfile::tempdir().unwrap();
        let t = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let request = StoryRequest::new(vec![MediaItem::photo("/p/IMG_1.jpg", t)], vec![], "Trip");
        let ctx = context_in(dir.path(), request);
        let step = TimelineStep::new();
        let mut state = JobState::new("job");

        assert!(step.validate_output(&ctx, &state).is_err());

        step.validate_input(&ctx).unwrap();
        assert_eq!(step.execute(&ctx, &mut state).unwrap(), StepOutcome::Success);
        step.validate_output(&ctx, &state).unwrap();
    }
}
