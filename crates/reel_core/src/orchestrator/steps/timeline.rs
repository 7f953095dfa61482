//! Timeline step - orders every requested item chronologically.
//!
//! Items that failed to convert stay in the timeline; assembly leaves
//! out segments that do not exist.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome};
use crate::timeline::Timeline;

pub struct TimelineStep;

impl TimelineStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimelineStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for TimelineStep {
    fn name(&self) -> &str {
        "Timeline"
    }

    fn description(&self) -> &str {
        "Order photos and videos by capture time"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let timeline = Timeline::build(&ctx.request.photos, &ctx.request.videos);
        if let Some(earliest) = timeline.earliest() {
            ctx.logger.info(&format!(
                "Timeline of {} item(s) starting {}",
                timeline.len(),
                earliest.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        state.timeline = Some(timeline);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        let timeline = state
            .timeline
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Timeline not recorded"))?;
        if timeline.len() != ctx.request.total_items() {
            return Err(StepError::invalid_output(format!(
                "Timeline holds {} of {} item(s)",
                timeline.len(),
                ctx.request.total_items()
            )));
        }
        Ok(())
    }
}
