//! Per-run logger with file and callback output.
//!
//! Worker threads share one logger by reference, so every piece of
//! mutable state sits behind a mutex.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Logger for one story run.
pub struct JobLogger {
    log_path: PathBuf,
    file_writer: Mutex<Option<BufWriter<File>>>,
    callback: Option<LogCallback>,
    config: LogConfig,
    /// Recent external tool output.
    tail_buffer: Mutex<VecDeque<String>>,
    /// Last progress percentage written (compact mode).
    last_progress: Mutex<Option<u32>>,
}

impl JobLogger {
    /// Create a logger writing `<log_dir>/<job_name>.log`.
    pub fn new(
        job_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;
        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&job_name.into())));
        let file = File::create(&log_path)?;

        Ok(Self {
            log_path,
            file_writer: Mutex::new(Some(BufWriter::new(file))),
            callback,
            tail_buffer: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
            last_progress: Mutex::new(None),
        })
    }

    /// Log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the given level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Log an external command line.
    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    pub fn section(&self, section_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(section_name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Log command tokens one per line, for debugging argument lists.
    pub fn command_tokens(&self, tokens: &[String]) {
        if self.config.level > LogLevel::Debug {
            return;
        }
        self.debug(&format!("argv:\n  {}", tokens.join(" \\\n  ")));
    }

    /// Log batch progress, thinned out in compact mode.
    ///
    /// Returns whether a line was written.
    pub fn progress(&self, completed: u64, total: u64) -> bool {
        let percent = if total == 0 {
            100
        } else {
            ((completed.min(total) * 100) / total) as u32
        };

        if self.config.compact {
            let mut last = self.last_progress.lock();
            let step = self.config.progress_step.max(1);
            if let Some(previous) = *last {
                if percent / step <= previous / step && percent < 100 {
                    return false;
                }
                if percent == previous {
                    return false;
                }
            }
            *last = Some(percent);
        }

        self.info(&format!("Progress: {}/{} ({}%)", completed, total, percent));
        true
    }

    /// Record one output line of an external tool.
    ///
    /// Always kept in the tail buffer; only written in full mode.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        {
            let mut buffer = self.tail_buffer.lock();
            if self.config.error_tail > 0 && buffer.len() >= self.config.error_tail {
                buffer.pop_front();
            }
            if self.config.error_tail > 0 {
                buffer.push_back(line.to_string());
            }
        }

        if self.config.compact {
            return;
        }

        let prefix = if is_stderr { "[stderr] " } else { "" };
        self.log(LogLevel::Debug, &format!("{}{}", prefix, line));
    }

    /// Dump the tail buffer under a header, typically after a tool failed.
    pub fn show_tail(&self, header: &str) {
        let buffer = self.tail_buffer.lock();
        if buffer.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in buffer.iter() {
            self.output(&self.format_message(line));
        }
    }

    /// Copy of the tail buffer.
    pub fn get_tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Flush and close the log file. Later messages only reach the callback.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }
        if let Some(ref callback) = self.callback {
            callback(formatted);
        }
    }
}

impl Drop for JobLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Replace characters that are not allowed in file names.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn quiet_config() -> LogConfig {
        LogConfig {
            show_timestamps: false,
            ..LogConfig::default()
        }
    }

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("summer", dir.path(), LogConfig::default(), None).unwrap();

        assert!(logger.log_path().exists());
        assert!(logger.log_path().ends_with("summer.log"));
    }

    #[test]
    fn writes_prefixed_lines_to_file() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("summer", dir.path(), quiet_config(), None).unwrap();

        logger.phase("Photos");
        logger.warn("IMG_1.jpg skipped");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("=== Photos ==="));
        assert!(content.contains("[WARNING] IMG_1.jpg skipped"));
    }

    #[test]
    fn level_filters_debug() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("summer", dir.path(), quiet_config(), None).unwrap();

        logger.debug("hidden");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(!content.contains("hidden"));
    }

    #[test]
    fn forwards_to_callback() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let callback: LogCallback = Box::new(move |_: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let logger = JobLogger::new("summer", dir.path(), quiet_config(), Some(callback)).unwrap();

        logger.info("one");
        logger.info("two");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn compact_progress_is_thinned() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("summer", dir.path(), quiet_config(), None).unwrap();

        assert!(logger.progress(1, 20)); // first line always
        assert!(!logger.progress(2, 20)); // 10%
        assert!(logger.progress(4, 20)); // 20%
        assert!(!logger.progress(5, 20)); // 25%
        assert!(logger.progress(20, 20)); // 100%
        assert!(!logger.progress(20, 20));
    }

    #[test]
    fn tail_buffer_keeps_last_lines() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            error_tail: 5,
            ..quiet_config()
        };
        let logger = JobLogger::new("summer", dir.path(), config, None).unwrap();

        for i in 0..10 {
            logger.output_line(&format!("frame={}", i), true);
        }

        let tail = logger.get_tail();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0], "frame=5");
        assert_eq!(tail[4], "frame=9");
    }

    #[test]
    fn show_tail_writes_header_and_lines() {
        let dir = tempdir().unwrap();
        let logger = JobLogger::new("summer", dir.path(), quiet_config(), None).unwrap();

        logger.output_line("Invalid data found", true);
        logger.show_tail("ffmpeg");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("[ffmpeg/tail]"));
        assert!(content.contains("Invalid data found"));
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("2024-Summer"), "2024-Summer");
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename("what?<now>"), "what__now_");
    }
}
