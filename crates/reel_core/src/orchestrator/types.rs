//! Core types for the orchestrator pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::JobLogger;
use crate::models::StoryRequest;
use crate::progress::ProgressTracker;
use crate::timeline::Timeline;
use crate::transcode::{BatchReport, ItemFailure};
use crate::workdir::WorkDir;

/// Step-level progress callback.
///
/// Arguments: (step_name, percent_complete, message)
pub type StepCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Read-only context passed to pipeline steps.
///
/// Contains the request and shared resources that steps can read but
/// not modify. Mutable state goes in `JobState`.
pub struct Context {
    /// Media to process and the event description.
    pub request: StoryRequest,
    /// Application settings.
    pub settings: Settings,
    /// Job name, used for the log file.
    pub job_name: String,
    /// This run's scratch directory.
    pub work_dir: WorkDir,
    /// Per-job logger.
    pub logger: Arc<JobLogger>,
    /// Item-level progress, shared with the worker threads.
    pub progress: ProgressTracker,
    step_callback: Option<StepCallback>,
}

impl Context {
    /// Create a new context for a job.
    pub fn new(
        request: StoryRequest,
        settings: Settings,
        job_name: impl Into<String>,
        work_dir: WorkDir,
        logger: Arc<JobLogger>,
        progress: ProgressTracker,
    ) -> Self {
        Self {
            request,
            settings,
            job_name: job_name.into(),
            work_dir,
            logger,
            progress,
            step_callback: None,
        }
    }

    /// Set the step callback.
    pub fn with_step_callback(mut self, callback: StepCallback) -> Self {
        self.step_callback = Some(callback);
        self
    }

    /// Report step progress to the callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.step_callback {
            callback(step_name, percent, message);
        }
    }
}

/// Mutable job state that accumulates results from pipeline steps.
///
/// Steps add their own section and leave the others alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    /// Unique job identifier.
    pub job_id: String,
    /// When the job started.
    pub started_at: Option<String>,
    /// Resolved encoder executable (from Prepare).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg: Option<PathBuf>,
    /// Photo conversion results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<BatchReport>,
    /// Video conversion results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<BatchReport>,
    /// The ordered story.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Timeline>,
    /// Assembly results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly: Option<AssemblyOutput>,
}

impl JobState {
    /// Create a new job state with the given ID.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Encoder path resolved by the Prepare step.
    pub fn ffmpeg(&self) -> Option<&Path> {
        self.ffmpeg.as_deref()
    }

    /// Items that failed in either batch, photos first.
    pub fn failures(&self) -> Vec<ItemFailure> {
        self.photos
            .iter()
            .chain(self.videos.iter())
            .flat_map(|report| report.failures.iter().cloned())
            .collect()
    }

    /// Assembled file still inside the working directory, if any.
    pub fn output_path(&self) -> Option<&Path> {
        self.assembly.as_ref().and_then(|a| a.output_path.as_deref())
    }
}

/// Output from the Assemble step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblyOutput {
    /// Joined file, `None` when there was nothing to join.
    pub output_path: Option<PathBuf>,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (nothing to do, but not an error).
    Skipped(String),
}
