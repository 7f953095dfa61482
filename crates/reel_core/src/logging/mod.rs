//! Logging for story runs.
//!
//! Two layers:
//! - [`JobLogger`]: one per run, writes a log file in the logs folder and
//!   forwards every line to an optional caller callback. Output of the
//!   external tool is kept in a tail buffer and dumped when a tool fails.
//! - `tracing`: library-wide diagnostics, installed once by the binary
//!   through [`init_tracing`].
//!
//! ```no_run
//! use reel_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new("2024-summer", "/tmp/logs", LogConfig::default(), None).unwrap();
//! logger.phase("Photos");
//! logger.command("ffmpeg -framerate 25 -i pict_%d.jpg out.mpg");
//! logger.success("Story assembled");
//! ```

mod job_logger;
mod types;

pub use job_logger::{sanitize_filename, JobLogger};
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level`. Call once at startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_strings() {
        assert_eq!(LogLevel::Debug.as_filter(), "debug");
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
    }
}
