//! Shared test utilities.
//!
//! Images are synthesized with the `image` crate rather than checked in, so
//! every test owns its fixtures inside a `TempDir`.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_png(&tmp.path().join("in.png"), 200, 100);
//! let bytes = image_bytes(64, 48, image::ImageFormat::Jpeg);
//! ```

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// A gradient, so resampling and crops produce distinguishable pixels.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

/// Encode a gradient of the given size in `format`.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    gradient(width, height).write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::write(path, image_bytes(width, height, ImageFormat::Png)).unwrap();
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, image_bytes(width, height, ImageFormat::Jpeg)).unwrap();
}

pub fn write_gif(path: &Path, width: u32, height: u32) {
    std::fs::write(path, image_bytes(width, height, ImageFormat::Gif)).unwrap();
}
