//! Image detail inspection: byte size, MIME type, and pixel dimensions.
//!
//! The MIME type is sniffed from the leading bytes with `infer`, never taken
//! from a file extension or an upload's declared content type. Dimensions come
//! from the backend's header read, so no pixels are decoded here.

use crate::error::HandleError;
use crate::imaging::{ImageBackend, ReadSeek};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Bytes read from the start of a stream for MIME sniffing.
pub const SNIFF_LEN: u64 = 8192;

/// What was detected about an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail {
    pub width: u32,
    pub height: u32,
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
}

impl Detail {
    /// File extension for the detected MIME type.
    pub fn extension(&self) -> Option<&'static str> {
        extension_for_mime(&self.mime)
    }
}

pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" => Some("bmp"),
        "image/tiff" => Some("tif"),
        _ => None,
    }
}

/// Sniff the MIME type of `header`.
///
/// Returns `Err(NotAnImage)` when nothing matches or the match is not an
/// image type.
pub fn sniff_mime(header: &[u8]) -> Result<&'static str, HandleError> {
    match infer::get(header) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(kind.mime_type()),
        Some(kind) => Err(HandleError::NotAnImage(Some(kind.mime_type().to_string()))),
        None => Err(HandleError::NotAnImage(None)),
    }
}

/// Inspect a stream positioned anywhere; it is rewound before each read.
pub fn inspect(
    backend: &impl ImageBackend,
    reader: &mut dyn ReadSeek,
    size: u64,
) -> Result<Detail, HandleError> {
    reader.seek(SeekFrom::Start(0))?;
    let mut header = Vec::with_capacity(SNIFF_LEN.min(size.max(1)) as usize);
    Read::take(&mut *reader, SNIFF_LEN).read_to_end(&mut header)?;
    let mime = sniff_mime(&header)?;

    reader.seek(SeekFrom::Start(0))?;
    let dims = backend.identify(reader)?;

    Ok(Detail {
        width: dims.width,
        height: dims.height,
        mime: mime.to_string(),
        size,
    })
}

/// Inspect a file on disk.
pub fn inspect_path(backend: &impl ImageBackend, path: &Path) -> Result<Detail, HandleError> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();
    inspect(backend, &mut file, size)
}
