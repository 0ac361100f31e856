//! Error type stored on an [`ImageHandle`](crate::ImageHandle).
//!
//! Every step of a chain funnels its failure into one [`HandleError`]. The
//! first error wins; later steps see it and do nothing.

use crate::imaging::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("not a recognized image{}", detected_suffix(.0))]
    NotAnImage(Option<String>),
    #[error("no encoder available for {0}")]
    UnsupportedFormat(String),
    #[error("destination path is not set")]
    MissingDestination,
    #[error("invalid file name '{0}'")]
    InvalidName(String),
    #[error("invalid resize options: {0}")]
    InvalidResize(String),
    #[error("staged copy is {copied} bytes, expected {expected}")]
    SizeMismatch { expected: u64, copied: u64 },
    #[error("image has not been inspected")]
    NotInspected,
}

fn detected_suffix(mime: &Option<String>) -> String {
    match mime {
        Some(m) => format!(" (detected {m})"),
        None => String::new(),
    }
}
