//! Story reel core - builds one chronological story video from a folder
//! of photos and camera clips.
//!
//! This crate contains all processing logic with zero front-end
//! dependencies. The `story-reel` binary is a thin caller.

pub mod assemble;
pub mod config;
pub mod discovery;
pub mod ffmpeg;
pub mod imaging;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod timeline;
pub mod transcode;
pub mod workdir;

#[cfg(test)]
pub(crate) mod test_support;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
