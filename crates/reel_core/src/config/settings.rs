//! Settings struct with TOML-based sections.
//!
//! Each section maps to one TOML table and can be rewritten on its own
//! by the config manager. Every field carries a serde default, so a
//! partial file loads cleanly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};
use crate::models::TimestampSource;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Photo segment settings.
    #[serde(default)]
    pub photos: PhotoSettings,

    /// Media discovery settings.
    #[serde(default)]
    pub discovery: DiscoverySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Output, scratch and log locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder the finished story is moved into.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Parent of the per-run working directories.
    ///
    /// Empty means `<system temp>/story-reel`.
    #[serde(default)]
    pub temp_root: String,

    /// Folder for run logs.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Keep the working directory when a run fails.
    #[serde(default = "default_true")]
    pub keep_failed_work_dir: bool,
}

fn default_output_folder() -> String {
    "stories".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_root: String::new(),
            logs_folder: default_logs_folder(),
            keep_failed_work_dir: true,
        }
    }
}

impl PathSettings {
    /// Resolved root for working directories.
    pub fn temp_root_path(&self) -> PathBuf {
        if self.temp_root.trim().is_empty() {
            std::env::temp_dir().join("story-reel")
        } else {
            PathBuf::from(&self.temp_root)
        }
    }
}

/// External tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    /// ffmpeg executable: a bare name looked up on `PATH`, or a path.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
        }
    }
}

/// Photo segment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSettings {
    /// Length of the steady hold clip in seconds.
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u32,

    /// Pre-made AC-3 silence track. Empty means generate one with ffmpeg.
    #[serde(default)]
    pub silence_asset: String,
}

fn default_hold_seconds() -> u32 {
    4
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            hold_seconds: default_hold_seconds(),
            silence_asset: String::new(),
        }
    }
}

impl PhotoSettings {
    /// Configured silence asset, if any.
    pub fn silence_asset_path(&self) -> Option<PathBuf> {
        let trimmed = self.silence_asset.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// Media discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Extensions classified as photos (case-insensitive, no dot).
    #[serde(default = "default_photo_extensions")]
    pub photo_extensions: Vec<String>,

    /// Extensions classified as videos (case-insensitive, no dot).
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Filesystem time used as the capture timestamp.
    #[serde(default)]
    pub timestamp_source: TimestampSource,
}

fn default_photo_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string()]
}

fn default_video_extensions() -> Vec<String> {
    vec!["mts".to_string(), "m2ts".to_string()]
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            photo_extensions: default_photo_extensions(),
            video_extensions: default_video_extensions(),
            timestamp_source: TimestampSource::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Keep tool output out of the log unless a tool fails.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Tool output lines shown after a failure.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Minimum level written to run logs.
    #[serde(default)]
    pub level: LogLevel,
}

fn default_error_tail() -> u32 {
    20
}

impl LoggingSettings {
    /// Logger configuration for one run.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            compact: self.compact,
            error_tail: self.error_tail as usize,
            ..LogConfig::default()
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            level: LogLevel::default(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Tools,
    Photos,
    Discovery,
    Logging,
}

impl ConfigSection {
    /// Every section, in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Paths,
        ConfigSection::Tools,
        ConfigSection::Photos,
        ConfigSection::Discovery,
        ConfigSection::Logging,
    ];

    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tools => "tools",
            ConfigSection::Photos => "photos",
            ConfigSection::Discovery => "discovery",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the table.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Output, working and log directories",
            ConfigSection::Tools => "External tools",
            ConfigSection::Photos => "Photo clips",
            ConfigSection::Discovery => "Which files count as photos and videos",
            ConfigSection::Logging => "Run logs",
        }
    }
}
