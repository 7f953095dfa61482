//! Helpers shared by unit tests.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

/// Stand-in encoder that creates its last argument as an empty file.
pub const TOUCHING_TOOL: &str = "#!/bin/sh\nfor last; do :; done\n: > \"$last\"\n";

/// Stand-in encoder that always fails.
pub const FAILING_TOOL: &str = "#!/bin/sh\necho \"Conversion failed!\" >&2\nexit 1\n";

/// Write an executable script named `fake-ffmpeg` into `dir`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write a small landscape JPEG.
pub fn write_photo(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(64, 48, Rgb([200, 180, 160]))
        .save(&path)
        .unwrap();
    path
}
