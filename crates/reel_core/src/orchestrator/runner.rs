//! Story runner: one call turns a request into a finished story file.
//!
//! The runner owns everything around the pipeline: the per-run working
//! directory, the logger, progress wiring, moving the result into the
//! output folder and cleaning up afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::logging::{JobLogger, LogCallback};
use crate::models::StoryRequest;
use crate::progress::{ProgressCallback, ProgressTracker};
use crate::transcode::ItemFailure;
use crate::workdir::WorkDir;

use super::errors::{PipelineError, StepError, StepResult};
use super::pipeline::CancelHandle;
use super::types::{Context, JobState, StepCallback};
use super::{create_standard_pipeline, Pipeline, PipelineRunResult};

/// Optional observers for one run.
#[derive(Default)]
pub struct RunCallbacks {
    /// Every formatted log line.
    pub log: Option<LogCallback>,
    /// `(completed, total)` after each item starts.
    pub progress: Option<ProgressCallback>,
    /// Step boundaries.
    pub step: Option<StepCallback>,
}

/// Result of one story run.
#[derive(Debug, Clone)]
pub struct StoryResult {
    /// Run identifier (the working directory name).
    pub job_id: String,
    /// Whether the run completed without a fatal error.
    pub success: bool,
    /// Final story file; `None` on failure or when nothing was produced.
    pub output_path: Option<PathBuf>,
    /// Items that were left out of the story.
    pub failures: Vec<ItemFailure>,
    /// Error message (if failed).
    pub error: Option<String>,
    /// Working directory left on disk for inspection.
    pub kept_work_dir: Option<PathBuf>,
    /// Run log file.
    pub log_path: Option<PathBuf>,
    /// Steps that completed.
    pub steps_completed: Vec<String>,
    /// Steps that were skipped.
    pub steps_skipped: Vec<String>,
}

impl StoryResult {
    /// Create a successful result. `output_path` is `None` when there
    /// was nothing to assemble.
    pub fn success(
        job_id: String,
        output_path: Option<PathBuf>,
        failures: Vec<ItemFailure>,
        run_result: PipelineRunResult,
    ) -> Self {
        Self {
            job_id,
            success: true,
            output_path,
            failures,
            error: None,
            kept_work_dir: None,
            log_path: None,
            steps_completed: run_result.steps_completed,
            steps_skipped: run_result.steps_skipped,
        }
    }

    /// Create a failed result.
    pub fn failure(job_id: String, error: impl Into<String>) -> Self {
        Self {
            job_id,
            success: false,
            output_path: None,
            failures: Vec::new(),
            error: Some(error.into()),
            kept_work_dir: None,
            log_path: None,
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        }
    }

    /// Check if a story file was produced.
    pub fn has_output(&self) -> bool {
        self.output_path.is_some()
    }
}

/// Runs story requests through the standard pipeline.
///
/// # Example
///
/// ```ignore
/// let runner = StoryRunner::new(settings);
/// let result = runner.run(request, RunCallbacks::default());
/// if let Some(path) = result.output_path {
///     println!("Saved {}", path.display());
/// }
/// ```
pub struct StoryRunner {
    settings: Settings,
    pipeline: Pipeline,
}

impl StoryRunner {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            pipeline: create_standard_pipeline(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Handle that stops the pipeline at its next step boundary.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.pipeline.cancel_handle()
    }

    /// Build one story.
    ///
    /// Never panics on bad input and never promotes a partial result:
    /// either the story lands in the output folder or `success` is false
    /// and `error` says why.
    pub fn run(&self, request: StoryRequest, callbacks: RunCallbacks) -> StoryResult {
        let label = match request.event_label() {
            label if label.is_empty() => "story".to_string(),
            label => label,
        };

        let temp_root = self.settings.paths.temp_root_path();
        let work_dir = match WorkDir::create_unique(&temp_root) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!("Could not create working directory: {}", e);
                return StoryResult::failure(
                    String::new(),
                    PipelineError::setup_failed(&label, e.to_string()).to_string(),
                );
            }
        };
        let job_id = work_dir.id().to_string();
        let job_name = format!("{}-{}", label, job_id.split('-').next().unwrap_or(&job_id));

        let logger = match JobLogger::new(
            &job_name,
            &self.settings.paths.logs_folder,
            self.settings.logging.log_config(),
            callbacks.log,
        ) {
            Ok(l) => Arc::new(l),
            Err(e) => {
                discard_work_dir(&work_dir);
                return StoryResult::failure(
                    job_id,
                    PipelineError::setup_failed(&job_name, format!("Failed to create logger: {}", e))
                        .to_string(),
                );
            }
        };

        let total = request.total_items() as u64;
        let progress = progress_tracker(Arc::clone(&logger), callbacks.progress);
        progress.set_total(total);

        logger.section(&format!("Story: {}", label));
        logger.info(&format!(
            "{} photo(s), {} video(s)",
            request.photos.len(),
            request.videos.len()
        ));

        let mut ctx = Context::new(
            request,
            self.settings.clone(),
            &job_name,
            work_dir,
            Arc::clone(&logger),
            progress,
        );
        if let Some(callback) = callbacks.step {
            ctx = ctx.with_step_callback(callback);
        }

        let mut state = JobState::new(&job_id);
        let mut result = match self.pipeline.run(&ctx, &mut state) {
            Ok(run_result) => self.finish(&ctx, &state, run_result),
            Err(e) => {
                let message = format!("Pipeline failed: {}", e);
                ctx.logger.error(&message);
                let mut result = StoryResult::failure(job_id, message);
                result.kept_work_dir = self.abandon(&ctx);
                result
            }
        };

        if result.failures.is_empty() {
            result.failures = state.failures();
        }
        for failure in &result.failures {
            logger.warn(&format!("Left out {}: {}", failure.path.display(), failure.message));
        }
        result.log_path = Some(logger.log_path().to_path_buf());
        logger.flush();
        result
    }

    /// Move the assembled file out and drop the working directory.
    fn finish(&self, ctx: &Context, state: &JobState, run_result: PipelineRunResult) -> StoryResult {
        let job_id = state.job_id.clone();

        let Some(assembled) = state.output_path() else {
            ctx.logger.warn("Nothing was assembled, no story written");
            discard_work_dir(&ctx.work_dir);
            return StoryResult::success(job_id, None, state.failures(), run_result);
        };

        let output_dir = PathBuf::from(&self.settings.paths.output_folder);
        match promote(assembled, &output_dir) {
            Ok(path) => {
                ctx.logger
                    .success(&format!("Story saved to {}", path.display()));
                discard_work_dir(&ctx.work_dir);
                StoryResult::success(job_id, Some(path), state.failures(), run_result)
            }
            Err(e) => {
                let message = format!("Could not save story: {}", e);
                ctx.logger.error(&message);
                let mut result = StoryResult::failure(job_id, message);
                result.kept_work_dir = self.abandon(ctx);
                result
            }
        }
    }

    /// Apply the failed-run policy. Returns the directory if it was kept.
    fn abandon(&self, ctx: &Context) -> Option<PathBuf> {
        if self.settings.paths.keep_failed_work_dir {
            ctx.logger.warn(&format!(
                "Working directory kept at {}",
                ctx.work_dir.root().display()
            ));
            Some(ctx.work_dir.root().to_path_buf())
        } else {
            discard_work_dir(&ctx.work_dir);
            None
        }
    }
}

/// Progress tracker that also writes (thinned) progress lines to the log.
fn progress_tracker(logger: Arc<JobLogger>, callback: Option<ProgressCallback>) -> ProgressTracker {
    ProgressTracker::with_callback(Box::new(move |completed, total| {
        logger.progress(completed, total);
        if let Some(ref callback) = callback {
            callback(completed, total);
        }
    }))
}

/// Move `source` into `dir`, keeping its file name.
///
/// Rename first; across filesystems fall back to copy and delete.
pub fn promote(source: &Path, dir: &Path) -> StepResult<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| StepError::io_error(format!("creating {}", dir.display()), e))?;
    let file_name = source.file_name().ok_or_else(|| {
        StepError::invalid_output(format!("{} has no file name", source.display()))
    })?;
    let target = dir.join(file_name);

    if let Err(e) = fs::rename(source, &target) {
        tracing::debug!("Rename to {} failed ({}), copying", target.display(), e);
        fs::copy(source, &target).map_err(|e| {
            StepError::io_error(format!("copying {} to {}", source.display(), target.display()), e)
        })?;
        if let Err(e) = fs::remove_file(source) {
            tracing::warn!("Could not remove {}: {}", source.display(), e);
        }
    }
    Ok(target)
}

fn discard_work_dir(work_dir: &WorkDir) {
    if let Err(e) = work_dir.remove() {
        tracing::warn!("{}", e);
    }
}
