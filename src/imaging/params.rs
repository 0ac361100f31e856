//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`ImageHandle`](crate::ImageHandle) (which decides
//! the target size and output encoding) and the [`backend`](super::backend)
//! (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`Quality`] — JPEG encoding quality (1–100, default 100). Clamped on construction.
//! - [`PngCompression`] — PNG deflate effort (`default`, `fast`, `best`).
//! - [`QualityMap`] — Per-format encoding settings carried by a handle.
//! - [`Encoding`] — The concrete encoder choice for one save.
//! - [`TransformParams`] — Everything one resize needs: file, target size, anchor, encoding.

use crate::resize::Anchor;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// JPEG quality setting (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

/// PNG compression level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    #[default]
    Default,
    Fast,
    Best,
}

impl PngCompression {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Fast => "fast",
            Self::Best => "best",
        }
    }
}

impl fmt::Display for PngCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PngCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "fast" => Ok(Self::Fast),
            "best" => Ok(Self::Best),
            other => Err(format!(
                "unknown PNG compression '{other}' (expected default, fast or best)"
            )),
        }
    }
}

/// A single quality change, routed to the format it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySetting {
    Jpeg(Quality),
    Png(PngCompression),
}

impl From<Quality> for QualitySetting {
    fn from(q: Quality) -> Self {
        Self::Jpeg(q)
    }
}

impl From<PngCompression> for QualitySetting {
    fn from(c: PngCompression) -> Self {
        Self::Png(c)
    }
}

/// Encoding settings per output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityMap {
    pub jpeg: Quality,
    pub png: PngCompression,
}

impl QualityMap {
    pub fn apply(&mut self, setting: QualitySetting) {
        match setting {
            QualitySetting::Jpeg(q) => self.jpeg = q,
            QualitySetting::Png(c) => self.png = c,
        }
    }
}

/// How a transformed image is written back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Jpeg(Quality),
    Png(PngCompression),
    /// Any other writable format, encoded with the library defaults.
    Native(ImageFormat),
}

impl Encoding {
    /// Pick the encoder for a sniffed MIME type.
    ///
    /// Returns `None` when no encoder for the format is compiled in.
    pub fn for_mime(mime: &str, quality: &QualityMap) -> Option<Self> {
        match mime {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg(quality.jpeg)),
            "image/png" => Some(Self::Png(quality.png)),
            other => ImageFormat::from_mime_type(other)
                .filter(|fmt| fmt.writing_enabled())
                .map(Self::Native),
        }
    }
}

/// Parameters for an in-place resize of a staged file.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformParams {
    /// Staged file; read, then truncated and rewritten.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Cover-and-crop at this anchor instead of an exact scale.
    pub anchor: Option<Anchor>,
    pub encoding: Encoding,
}
