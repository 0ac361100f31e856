//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` (header only) |
//! | **Resize** | Lanczos3 `resize_exact` |
//! | **Anchored fill** | Lanczos3 cover resize + `crop_imm` |
//! | **Encode** | `JpegEncoder` / `PngEncoder` / native `write_to` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ReadSeek};
pub use calculations::{anchor_offset, calculate_fill_dimensions, complete_dimensions, scale_edge};
pub use params::{Encoding, PngCompression, Quality, QualityMap, QualitySetting, TransformParams};
pub use rust_backend::RustBackend;
