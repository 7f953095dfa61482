//! ffmpeg invocation.
//!
//! - **command**: argument-token builder, no shell and no string splicing
//! - **profile**: the fixed DVD-compatible encoding policy and the command
//!   lines built from it
//! - **runner**: executes a command, feeds its output to the run logger and
//!   turns a non-zero exit into an error

mod command;
pub mod profile;
mod runner;

use std::io;

use thiserror::Error;

pub use command::FfmpegCommand;
pub use runner::{locate, null_device, run};

/// Error type for external tool invocations.
#[derive(Error, Debug)]
pub enum FfmpegError {
    /// The configured executable could not be found.
    #[error("{tool} not found: {source}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    /// The process could not be started.
    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },
}

impl FfmpegError {
    /// Create a command failed error.
    pub fn command_failed(tool: impl Into<String>, exit_code: i32, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }
}

/// Result type for external tool invocations.
pub type FfmpegResult<T> = Result<T, FfmpegError>;
