//! Pipeline orchestrator for building a story.
//!
//! A run consists of a sequence of steps that validate, execute, and
//! record their results in a shared job state.
//!
//! # Architecture
//!
//! ```text
//! StoryRunner
//!     └── Pipeline
//!           ├── Step: Prepare    (encoder, working directory, silence)
//!           ├── Step: Photos     (fade-in, hold, fade-out per photo)
//!           ├── Step: Videos     (two-pass re-encode per clip)
//!           ├── Step: Timeline   (chronological order)
//!           └── Step: Assemble   (manifest + concatenation)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use reel_core::orchestrator::{RunCallbacks, StoryRunner};
//!
//! let runner = StoryRunner::new(settings);
//! let result = runner.run(request, RunCallbacks::default());
//! println!("Completed: {:?}", result.steps_completed);
//! ```

mod errors;
mod pipeline;
mod runner;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{CancelHandle, Pipeline, PipelineRunResult};
pub use runner::{promote, RunCallbacks, StoryResult, StoryRunner};
pub use step::PipelineStep;
pub use steps::{AssembleStep, PhotosStep, PrepareStep, TimelineStep, VideosStep};
pub use types::{AssemblyOutput, Context, JobState, StepCallback, StepOutcome};

/// Create a standard pipeline with all steps in the correct order.
///
/// 1. Prepare - resolve ffmpeg, create the scratch layout, silence track
/// 2. Photos - photo clips on the worker pool
/// 3. Videos - two-pass video re-encodes
/// 4. Timeline - order every item by capture time
/// 5. Assemble - write the manifest and join the segments
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(PrepareStep::new())
        .with_step(PhotosStep::new())
        .with_step(VideosStep::new())
        .with_step(TimelineStep::new())
        .with_step(AssembleStep::new())
}
