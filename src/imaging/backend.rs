//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the handle needs
//! from an imaging library: identify (read dimensions from a header) and
//! transform (decode, resize, re-encode in place).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a recording mock.

use super::params::TransformParams;
use std::io::{Read, Seek};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A readable, seekable byte stream (open file, upload part, in-memory buffer).
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions from the stream's header. The stream starts at offset 0.
    fn identify(&self, reader: &mut dyn ReadSeek) -> Result<Dimensions, BackendError>;

    /// Resize the file at `params.path` and overwrite it with the result.
    fn transform(&self, params: &TransformParams) -> Result<(), BackendError>;
}

impl<B: ImageBackend + ?Sized> ImageBackend for &B {
    fn identify(&self, reader: &mut dyn ReadSeek) -> Result<Dimensions, BackendError> {
        (**self).identify(reader)
    }

    fn transform(&self, params: &TransformParams) -> Result<(), BackendError> {
        (**self).transform(params)
    }
}
