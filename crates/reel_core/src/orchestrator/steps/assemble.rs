//! Assemble step - joins the existing segments in timeline order.

use crate::assemble::Assembler;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{AssemblyOutput, Context, JobState, StepOutcome};

pub struct AssembleStep;

impl AssembleStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssembleStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for AssembleStep {
    fn name(&self) -> &str {
        "Assemble"
    }

    fn description(&self) -> &str {
        "Write the manifest and join all segments"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.work_dir.root().is_dir() {
            return Err(StepError::invalid_input("Working directory does not exist"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let timeline = state
            .timeline
            .as_ref()
            .ok_or_else(|| StepError::precondition_failed("Timeline was not built"))?;
        let ffmpeg = state
            .ffmpeg
            .as_deref()
            .ok_or_else(|| StepError::precondition_failed("Encoder was not resolved"))?;

        let outcome = Assembler::new(ffmpeg, &ctx.work_dir, &ctx.logger)
            .assemble(timeline, &ctx.request.event_label())?;

        state.assembly = Some(AssemblyOutput {
            output_path: outcome.path().map(|p| p.to_path_buf()),
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.assembly.is_none() {
            return Err(StepError::invalid_output("Assembly not recorded"));
        }
        if let Some(path) = state.output_path() {
            if !path.is_file() {
                return Err(StepError::invalid_output(format!(
                    "{} does not exist",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoryRequest;
    use crate::orchestrator::types::test_context::context_in;
    use crate::timeline::Timeline;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn empty_timeline_records_no_output() {
        let dir = tempdir().unwrap();
        let ctx = context_in(dir.path(), StoryRequest::default());
        let mut state = JobState::new("job");
        state.ffmpeg = Some(PathBuf::from("ffmpeg"));
        state.timeline = Some(Timeline::default());
        let step = AssembleStep::new();

        step.execute(&ctx, &mut state).unwrap();
        step.validate_output(&ctx, &state).unwrap();
        assert!(state.assembly.is_some());
        assert_eq!(state.output_path(), None);
        assert!(!ctx.work_dir.manifest().exists());
    }

    #[test]
    fn missing_timeline_is_a_precondition_failure() {
        let dir = tempdir().unwrap();
        let ctx = context_in(dir.path(), StoryRequest::default());
        let mut state = JobState::new("job");
        state.ffmpeg = Some(PathBuf::from("ffmpeg"));

        let err = AssembleStep::new().execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(err, StepError::PreconditionFailed(_)));
    }
}
