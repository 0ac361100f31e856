//! # imgstage
//!
//! Stage an image, inspect it, resize it, and publish the result.
//!
//! An input arrives as a path on disk, a multipart upload part, or an open
//! file. It is inspected (byte size, sniffed MIME type, pixel dimensions),
//! copied into a private temp file, optionally resized there, and finally
//! published into a destination directory, after which the temp file and,
//! on request, the original are removed.
//!
//! ```text
//! from_path / from_upload / from_file   → inspect
//!   .set_destination(..) .set_name(..)  → configure
//!   .move_to_temp()                     → chunked copy into the staging dir
//!   .resize(..)                         → in-place resize of the staged copy
//!   .finish()                           → publish, clean up, report
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`handle`] | The fluent [`ImageHandle`] and its [`Finished`] report |
//! | [`source`] | Input kinds: path, [`Upload`] part, open file |
//! | [`detail`] | MIME sniffing and dimension inspection |
//! | [`staging`] | Chunked copy and the self-deleting [`StagedFile`](staging::StagedFile) |
//! | [`resize`] | [`ResizeOptions`], [`Anchor`], target-size math |
//! | [`imaging`] | [`ImageBackend`](imaging::ImageBackend) seam and the pure-Rust backend |
//! | [`config`] | Optional `imgstage.toml` loading and validation |
//! | [`error`] | [`HandleError`] |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Errors Travel With the Handle
//!
//! Each step consumes the handle and returns it. The first failure is stored
//! and every later step becomes a no-op, so a chain reads top to bottom with a
//! single check at the end ([`ImageHandle::finish`] returns it as a `Result`).
//!
//! ## Bytes Decide the Format
//!
//! The MIME type is sniffed from content with `infer`. File extensions and an
//! upload's declared content type are never trusted; the staged file's
//! extension is derived from the sniffed type.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling (Lanczos3), and encoding all go through the `image`
//! crate. There are no system libraries to install.

pub mod config;
pub mod detail;
pub mod error;
pub mod handle;
pub mod imaging;
pub mod output;
pub mod resize;
pub mod source;
pub mod staging;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::StageConfig;
pub use detail::Detail;
pub use error::HandleError;
pub use handle::{Finished, ImageHandle};
pub use imaging::{PngCompression, Quality};
pub use resize::{Anchor, ResizeOptions};
pub use source::{DiskUpload, MemoryUpload, Source, Upload};
