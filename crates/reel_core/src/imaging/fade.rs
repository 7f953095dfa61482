//! Fade sequence generation.
//!
//! Each fade frame is the previous one pulled a fixed percentage toward
//! black, so darkness compounds: after `n` steps a channel value is
//! roughly `v * 0.88^n`. The sequence is produced lazily from a running
//! accumulator, every frame its own owned buffer, so a caller writing
//! frames out holds at most two of them at a time.

use image::RgbImage;

/// Number of fade frames per photo.
pub const FADE_STEPS: usize = 12;

/// How far each step moves toward black, in percent.
pub const FADE_DARKEN_PERCENT: u32 = 12;

/// Blend every pixel `percent` toward black.
///
/// The result is never brighter than the input in any channel.
pub fn darken(frame: &RgbImage, percent: u32) -> RgbImage {
    let keep = 100 - percent.min(100);
    let mut out = frame.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = ((u32::from(*channel) * keep + 50) / 100) as u8;
        }
    }
    out
}

/// Produce the [`FADE_STEPS`] progressively darker frames for `base`.
///
/// The base frame itself is not part of the sequence; frame 1 is one
/// step darker than it. Frames are computed as the iterator advances.
pub fn fade_sequence(base: &RgbImage) -> impl Iterator<Item = RgbImage> {
    std::iter::successors(Some(darken(base, FADE_DARKEN_PERCENT)), |previous| {
        Some(darken(previous, FADE_DARKEN_PERCENT))
    })
    .take(FADE_STEPS)
}
