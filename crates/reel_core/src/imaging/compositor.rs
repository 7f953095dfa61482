//! Frame compositor.
//!
//! Turns one decoded photo into a full-height canvas: orientation is
//! applied first, the picture is scaled to fit without distortion, and
//! whatever the picture does not cover stays black. For the usual 4:3
//! or portrait photo that means equal pillars left and right; when the
//! horizontal slack is odd the right pillar is one pixel wider.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage};

use super::{ImagingError, ImagingResult};

/// Output canvas width.
pub const CANVAS_WIDTH: u32 = 1920;

/// Output canvas height.
pub const CANVAS_HEIGHT: u32 = 1080;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Decode an image and apply its embedded orientation.
///
/// A photo shot with the camera turned 90° comes back upright. The
/// returned pixels carry no orientation tag of their own, so frames
/// written from them never get rotated a second time downstream.
pub fn load_oriented(path: &Path) -> ImagingResult<DynamicImage> {
    let reader = ImageReader::open(path)
        .map_err(|e| ImagingError::io(format!("opening {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| ImagingError::io(format!("probing {}", path.display()), e))?;

    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ImagingError::decode(path, e))?;
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);

    let mut image = DynamicImage::from_decoder(decoder).map_err(|e| ImagingError::decode(path, e))?;
    if orientation != Orientation::NoTransforms {
        tracing::debug!("Applying {:?} to {}", orientation, path.display());
        image.apply_orientation(orientation);
    }

    Ok(image)
}

/// Compose an image onto the fixed black canvas.
pub fn compose(image: &DynamicImage) -> RgbImage {
    compose_onto(image, CANVAS_WIDTH, CANVAS_HEIGHT)
}

/// Decode, orient and compose a photo in one go.
pub fn compose_file(path: &Path) -> ImagingResult<RgbImage> {
    let image = load_oriented(path)?;
    Ok(compose(&image))
}

fn compose_onto(image: &DynamicImage, width: u32, height: u32) -> RgbImage {
    // `resize` keeps the aspect ratio and fits inside the bounds
    let fitted = image.resize(width, height, FilterType::Lanczos3).to_rgb8();

    let left = (width - fitted.width()) / 2;
    let top = (height - fitted.height()) / 2;

    let mut canvas = RgbImage::from_pixel(width, height, BLACK);
    imageops::replace(&mut canvas, &fitted, i64::from(left), i64::from(top));
    canvas
}
