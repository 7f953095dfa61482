//! Process execution for ffmpeg commands.

use std::path::{Path, PathBuf};

use crate::logging::JobLogger;

use super::{FfmpegCommand, FfmpegError, FfmpegResult};

/// Stderr lines carried in a failure message.
const FAILURE_LINES: usize = 5;

/// Resolve the configured executable.
///
/// A bare name is looked up on `PATH`; anything with a directory part
/// must point at an executable file.
pub fn locate(configured: &str) -> FfmpegResult<PathBuf> {
    which::which(configured).map_err(|source| FfmpegError::ToolNotFound {
        tool: configured.to_string(),
        source,
    })
}

/// Output sink that discards everything (first encoding pass).
pub fn null_device() -> &'static Path {
    if cfg!(windows) {
        Path::new("NUL")
    } else {
        Path::new("/dev/null")
    }
}

/// Run a command to completion.
///
/// Output lines go to the logger's tail buffer. On a non-zero exit the
/// tail is dumped and the error carries the last lines of this command's
/// own stderr.
pub fn run(command: &FfmpegCommand, logger: &JobLogger) -> FfmpegResult<()> {
    let tool = command.tool_name();
    logger.command(&command.display());
    logger.command_tokens(&command.tokens());

    let output = command
        .to_command()
        .output()
        .map_err(|source| FfmpegError::Spawn {
            tool: tool.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        logger.output_line(line, false);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stderr.lines() {
        logger.output_line(line, true);
    }

    if output.status.success() {
        return Ok(());
    }

    let exit_code = output.status.code().unwrap_or(-1);
    logger.show_tail(&tool);
    tracing::warn!("{} exited with {}", tool, exit_code);

    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let message = lines[lines.len().saturating_sub(FAILURE_LINES)..].join("\n");
    Err(FfmpegError::command_failed(tool, exit_code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogConfig;
    use tempfile::tempdir;

    #[test]
    fn missing_tool_is_reported() {
        let result = locate("definitely-not-an-installed-encoder-xyz");
        assert!(matches!(result, Err(FfmpegError::ToolNotFound { .. })));
    }

    #[test]
    fn null_device_is_platform_specific() {
        if cfg!(windows) {
            assert_eq!(null_device(), Path::new("NUL"));
        } else {
            assert_eq!(null_device(), Path::new("/dev/null"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn failure_carries_stderr_and_exit_code() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();

        let cmd = FfmpegCommand::new("sh").args(["-c", "echo 'Invalid data found' >&2; exit 3"]);
        match run(&cmd, &logger) {
            Err(FfmpegError::CommandFailed {
                tool,
                exit_code,
                message,
            }) => {
                assert_eq!(tool, "sh");
                assert_eq!(exit_code, 3);
                assert!(message.contains("Invalid data found"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(logger.get_tail(), vec!["Invalid data found".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn success_runs_in_current_dir() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();

        let cmd = FfmpegCommand::new("sh")
            .args(["-c", ": > created.txt"])
            .current_dir(dir.path());
        run(&cmd, &logger).unwrap();
        assert!(dir.path().join("created.txt").exists());
    }

    #[test]
    fn unstartable_program_is_spawn_error() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();

        let cmd = FfmpegCommand::new(dir.path().join("no-such-binary"));
        assert!(matches!(run(&cmd, &logger), Err(FfmpegError::Spawn { .. })));
    }
}
