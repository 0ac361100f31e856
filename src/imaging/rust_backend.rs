//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only, no pixel decode) |
//! | Decode (JPEG, PNG, GIF, WebP, TIFF, BMP) | `image` crate decoders |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Anchored crop | cover-resize + `DynamicImage::crop_imm` |
//! | Encode → JPEG | `JpegEncoder::new_with_quality` |
//! | Encode → PNG | `PngEncoder::new_with_quality` |
//! | Encode → other | `DynamicImage::write_to` with library defaults |

use super::backend::{BackendError, Dimensions, ImageBackend, ReadSeek};
use super::calculations::{anchor_offset, calculate_fill_dimensions};
use super::params::{Encoding, PngCompression, TransformParams};
use crate::resize::Anchor;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, trusting content over extension.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Fail unless a `width`x`height` buffer of `img`'s color type fits in the
/// decoder's default allocation limit.
fn check_allocation(img: &DynamicImage, width: u32, height: u32) -> Result<(), BackendError> {
    let limit = Limits::default().max_alloc.unwrap_or(u64::MAX);
    let bytes = u64::from(width)
        .saturating_mul(u64::from(height))
        .saturating_mul(u64::from(img.color().bytes_per_pixel()));
    if bytes > limit {
        return Err(BackendError::ProcessingFailed(format!(
            "{width}x{height} needs {bytes} bytes, over the {limit} byte limit"
        )));
    }
    Ok(())
}

/// Scale to cover `width`x`height`, then cut the box out at `anchor`.
fn fill(img: &DynamicImage, width: u32, height: u32, anchor: Anchor) -> DynamicImage {
    let (fill_w, fill_h) = calculate_fill_dimensions((img.width(), img.height()), (width, height));
    let covered = img.resize_exact(fill_w, fill_h, FilterType::Lanczos3);
    let (x, y) = anchor_offset((fill_w, fill_h), (width, height), anchor);
    covered.crop_imm(x, y, width, height)
}

fn png_compression(level: PngCompression) -> CompressionType {
    match level {
        PngCompression::Default => CompressionType::Default,
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Best => CompressionType::Best,
    }
}

/// Truncate `path` and write `img` into it with the chosen encoder.
fn save_image(img: &DynamicImage, path: &Path, encoding: Encoding) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);

    let encoded = match encoding {
        Encoding::Jpeg(quality) => {
            // JPEG has no alpha channel
            let rgb;
            let source = if img.color().has_alpha() {
                rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                &rgb
            } else {
                img
            };
            source.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality.value()))
        }
        Encoding::Png(level) => img.write_with_encoder(PngEncoder::new_with_quality(
            &mut writer,
            png_compression(level),
            PngFilter::Adaptive,
        )),
        Encoding::Native(format) => img.write_to(&mut writer, format),
    };
    encoded.map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })?;
    writer.flush().map_err(BackendError::Io)
}

impl ImageBackend for RustBackend {
    fn identify(&self, reader: &mut dyn ReadSeek) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(BufReader::new(reader))
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(Dimensions { width, height })
    }

    fn transform(&self, params: &TransformParams) -> Result<(), BackendError> {
        let img = load_image(&params.path)?;
        check_allocation(&img, params.width, params.height)?;
        let resized = match params.anchor {
            Some(anchor) => {
                let (fill_w, fill_h) =
                    calculate_fill_dimensions((img.width(), img.height()), (params.width, params.height));
                check_allocation(&img, fill_w, fill_h)?;
                fill(&img, params.width, params.height, anchor)
            }
            None => img.resize_exact(params.width, params.height, FilterType::Lanczos3),
        };
        // Decoding is complete; the staged original can now be overwritten.
        drop(img);
        save_image(&resized, &params.path, params.encoding)
    }
}
