//! Target encoding profile and the command lines built from it.
//!
//! Every segment shares one format so that the final concatenation can
//! copy streams without re-encoding: MPEG-2 video at 25 fps, 4:2:0,
//! in a PAL DVD program stream.

use std::path::Path;

use super::FfmpegCommand;

pub const VIDEO_CODEC: &str = "mpeg2video";
pub const FRAME_RATE: u32 = 25;
pub const PIXEL_FORMAT: &str = "yuv420p";
/// Fixed quantizer scale (`-q:v`).
pub const QUALITY: u32 = 2;
/// Bitrate target for two-pass video re-encodes.
pub const VIDEO_BITRATE: &str = "9000k";
/// Named output profile passed as `-target`.
pub const TARGET: &str = "pal-dvd";

pub const SILENCE_CODEC: &str = "ac3";
pub const SILENCE_SAMPLE_RATE: u32 = 48_000;

/// Which pass of a two-pass encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    First,
    Second,
}

impl Pass {
    fn number(self) -> &'static str {
        match self {
            Pass::First => "1",
            Pass::Second => "2",
        }
    }
}

/// Shared video encoding options.
fn encode_options(cmd: FfmpegCommand) -> FfmpegCommand {
    cmd.opt("-c:v", VIDEO_CODEC)
        .opt("-r", FRAME_RATE.to_string())
        .opt("-pix_fmt", PIXEL_FORMAT)
        .opt("-q:v", QUALITY.to_string())
}

/// Photo clip tail: silence as audio, stop with the picture.
fn photo_clip_tail(cmd: FfmpegCommand, silence: &Path, output: &Path) -> FfmpegCommand {
    let cmd = cmd
        .input(silence)
        .opt("-map", "0:0")
        .opt("-map", "1:0")
        .opt("-c:a", "copy");
    encode_options(cmd)
        .opt("-target", TARGET)
        .arg("-shortest")
        .arg(output)
}

/// Clip from a numbered frame sequence, reading upward from `start_number`
/// until the first missing number.
pub fn frame_sequence_clip(
    ffmpeg: &Path,
    pattern: &Path,
    start_number: usize,
    silence: &Path,
    output: &Path,
) -> FfmpegCommand {
    let cmd = FfmpegCommand::new(ffmpeg)
        .arg("-y")
        .opt("-framerate", FRAME_RATE.to_string())
        .opt("-start_number", start_number.to_string())
        .input(pattern);
    photo_clip_tail(cmd, silence, output)
}

/// Clip holding a single frame for `seconds`.
pub fn still_hold_clip(
    ffmpeg: &Path,
    frame: &Path,
    seconds: u32,
    silence: &Path,
    output: &Path,
) -> FfmpegCommand {
    let cmd = FfmpegCommand::new(ffmpeg)
        .arg("-y")
        .opt("-loop", "1")
        .opt("-framerate", FRAME_RATE.to_string())
        .opt("-t", seconds.to_string())
        .input(frame);
    photo_clip_tail(cmd, silence, output)
}

/// One pass of the two-pass video re-encode.
///
/// The first pass drops audio and writes to `output` (the null device);
/// the second copies the source audio.
pub fn video_pass(
    ffmpeg: &Path,
    input: &Path,
    pass: Pass,
    passlog: &Path,
    output: &Path,
) -> FfmpegCommand {
    let cmd = FfmpegCommand::new(ffmpeg)
        .arg("-y")
        .input(input)
        .opt("-pass", pass.number())
        .opt("-passlogfile", passlog);
    let cmd = match pass {
        Pass::First => cmd.arg("-an"),
        Pass::Second => cmd.opt("-c:a", "copy"),
    };
    encode_options(cmd)
        .opt("-b:v", VIDEO_BITRATE)
        .opt("-target", TARGET)
        .arg(output)
}

/// Stream-copy concatenation of a concat-demuxer manifest.
pub fn concat(ffmpeg: &Path, manifest: &Path, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(ffmpeg)
        .arg("-y")
        .opt("-f", "concat")
        .opt("-safe", "0")
        .input(manifest)
        .opt("-c", "copy")
        .opt("-target", TARGET)
        .arg(output)
}

/// Silent AC-3 track long enough to pad a photo hold clip.
pub fn silence(ffmpeg: &Path, seconds: u32, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(ffmpeg)
        .arg("-y")
        .opt("-f", "lavfi")
        .input(format!(
            "anullsrc=channel_layout=stereo:sample_rate={}",
            SILENCE_SAMPLE_RATE
        ))
        .opt("-t", seconds.to_string())
        .opt("-c:a", SILENCE_CODEC)
        .arg(output)
}
