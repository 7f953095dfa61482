//! Configuration for story runs.
//!
//! - TOML file with one table per concern
//! - Atomic writes (temp file, then rename)
//! - Single-section updates that leave the rest of the file alone
//!
//! ```no_run
//! use reel_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new("story-reel.toml");
//! config.load_or_create().unwrap();
//! println!("ffmpeg: {}", config.settings().tools.ffmpeg);
//!
//! config.settings_mut().photos.hold_seconds = 6;
//! config.update_section(ConfigSection::Photos).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, DiscoverySettings, LoggingSettings, PathSettings, PhotoSettings, Settings,
    ToolSettings,
};
