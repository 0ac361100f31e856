//! The fluent image handle.
//!
//! An [`ImageHandle`] wraps one [`Source`] and walks it through
//! inspect → stage → resize → publish:
//!
//! ```no_run
//! use imgstage::{Anchor, ImageHandle, Quality, ResizeOptions};
//!
//! let finished = ImageHandle::from_path("uploads/raw/cat.jpg")
//!     .set_destination("public/avatars")
//!     .set_name("cat-512")
//!     .set_quality(Quality::new(85))
//!     .resize(ResizeOptions::to_size(512, 512).anchor(Anchor::Center))
//!     .remove_origin(true)
//!     .finish()?;
//!
//! println!("{:?} → {:?}", finished.detail, finished.published);
//! # Ok::<(), imgstage::HandleError>(())
//! ```
//!
//! # Error propagation
//!
//! Every step takes `self` and returns it. A failing step stores its error on
//! the handle; each later step checks the slot first and returns untouched.
//! The caller looks once at the end, through [`ImageHandle::error`] or the
//! `Result` from [`ImageHandle::finish`].
//!
//! # Temp files
//!
//! The staged copy is created on the first [`move_to_temp`](ImageHandle::move_to_temp)
//! (which [`resize`](ImageHandle::resize) and [`finish`](ImageHandle::finish)
//! call on demand). It lives in a [`StagedFile`] guard, so it is removed when
//! the handle is dropped, when `finish` reports an error, or when `finish`
//! publishes it into the destination.

use crate::config::StageConfig;
use crate::detail::{self, Detail};
use crate::error::HandleError;
use crate::imaging::{
    Encoding, ImageBackend, QualityMap, QualitySetting, RustBackend, TransformParams,
    calculate_fill_dimensions,
};
use crate::resize::ResizeOptions;
use crate::source::{Source, Upload};
use crate::staging::{StagedFile, copy_chunked, is_plain_file_name};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Outcome of a successful [`ImageHandle::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    /// Detail of the published file (or of the input, if nothing was staged).
    pub detail: Detail,
    /// Where the result was published, if the handle was staged.
    pub published: Option<PathBuf>,
    pub resized: bool,
    pub origin_removed: bool,
}

/// A single image moving through inspect → stage → resize → publish.
pub struct ImageHandle<B: ImageBackend = RustBackend> {
    source: Source,
    backend: B,
    config: StageConfig,
    detail: Option<Detail>,
    quality: QualityMap,
    destination: Option<PathBuf>,
    name: Option<String>,
    staged: Option<StagedFile>,
    moved: bool,
    resized: bool,
    remove_origin: bool,
    error: Option<HandleError>,
}

impl ImageHandle<RustBackend> {
    /// Wrap an image on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(Source::Path(path.into()), RustBackend::new())
    }

    /// Wrap one file part of a multipart upload.
    pub fn from_upload(upload: impl Upload + 'static) -> Self {
        Self::new(Source::Upload(Box::new(upload)), RustBackend::new())
    }

    /// Wrap an already-open file. `path` is where it was opened from and is
    /// only used when the origin is removed.
    pub fn from_file(file: File, path: impl Into<PathBuf>) -> Self {
        Self::new(
            Source::File {
                file,
                path: path.into(),
            },
            RustBackend::new(),
        )
    }
}

impl<B: ImageBackend> ImageHandle<B> {
    /// Wrap `source`, using `backend` for all pixel work, and inspect it.
    pub fn new(source: Source, backend: B) -> Self {
        let config = StageConfig::default();
        let mut handle = Self {
            source,
            backend,
            quality: config.quality_map(),
            remove_origin: config.remove_origin,
            config,
            detail: None,
            destination: None,
            name: None,
            staged: None,
            moved: false,
            resized: false,
            error: None,
        };
        handle.inspect_source();
        handle
    }

    /// Swap the imaging backend. The input is inspected again with the new
    /// backend; settings carry over, anything already staged is dropped.
    ///
    /// A stored error survives the swap and takes precedence over anything
    /// the new inspection reports.
    pub fn with_backend<C: ImageBackend>(self, backend: C) -> ImageHandle<C> {
        let mut handle = ImageHandle::new(self.source, backend);
        handle.config = self.config;
        handle.quality = self.quality;
        handle.destination = self.destination;
        handle.name = self.name;
        handle.remove_origin = self.remove_origin;
        if let Some(err) = self.error {
            handle.error = Some(err);
        }
        handle
    }

    /// Replace the staging config. Resets the quality map and remove-origin
    /// flag to the config's values, so call it before the setters.
    pub fn with_config(mut self, config: StageConfig) -> Self {
        self.quality = config.quality_map();
        self.remove_origin = config.remove_origin;
        self.config = config;
        self
    }

    /// Directory the result is published into.
    pub fn set_destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = Some(path.into());
        self
    }

    /// File name for the published result. The detected extension is
    /// appended unless the name already ends in it. Staging always uses a
    /// generated name.
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set JPEG quality or PNG compression.
    pub fn set_quality(mut self, setting: impl Into<QualitySetting>) -> Self {
        self.quality.apply(setting.into());
        self
    }

    /// Delete the original input once the result is published.
    pub fn remove_origin(mut self, remove: bool) -> Self {
        self.remove_origin = remove;
        self
    }

    /// Latest inspection result; describes the staged copy once moved.
    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    /// First error the chain hit, if any.
    pub fn error(&self) -> Option<&HandleError> {
        self.error.as_ref()
    }

    /// The wrapped input.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Encoding settings used when a resize re-encodes the image.
    pub fn quality(&self) -> &QualityMap {
        &self.quality
    }

    /// Path of the staged copy, once moved.
    pub fn staged_path(&self) -> Option<&Path> {
        self.staged.as_ref().map(StagedFile::path)
    }

    /// Whether the input has been copied into the staging directory.
    pub fn is_moved(&self) -> bool {
        self.moved
    }

    /// Whether a resize completed on the staged copy.
    pub fn is_resized(&self) -> bool {
        self.resized
    }

    /// Copy the input into the staging directory.
    ///
    /// Requires a destination. Calling it again after a successful move does
    /// nothing.
    pub fn move_to_temp(mut self) -> Self {
        if self.error.is_some() || self.moved {
            return self;
        }
        if self.destination.is_none() {
            self.fail(HandleError::MissingDestination);
            return self;
        }

        match self.stage() {
            Ok(()) => self.moved = true,
            Err(e) => self.fail(e),
        }
        self
    }

    /// Resize the staged copy in place, staging first if needed.
    pub fn resize(mut self, options: ResizeOptions) -> Self {
        if self.error.is_some() {
            return self;
        }
        if let Err(e) = options.validate() {
            self.fail(e);
            return self;
        }

        self = self.move_to_temp();
        if self.error.is_some() {
            return self;
        }

        match self.apply_resize(&options) {
            Ok(()) => self.resized = true,
            Err(e) => self.fail(e),
        }
        self
    }

    /// Publish the staged result and clean up.
    ///
    /// On success the staged file has been moved into the destination and,
    /// if requested, the original input is gone. On error the staged file is
    /// deleted and the stored error is returned; the original is never
    /// touched.
    ///
    /// Once the result is published, failing to remove the original does not
    /// turn the call into an error: it is logged and reported through
    /// [`Finished::origin_removed`] being `false`, so the published path is
    /// never lost.
    pub fn finish(mut self) -> Result<Finished, HandleError> {
        if self.destination.is_some() {
            self = self.move_to_temp();
        }
        if let Some(err) = self.error.take() {
            log::warn!("discarding {}: {err}", self.source);
            return Err(err);
        }

        let detail = self.detail.take().ok_or(HandleError::NotInspected)?;

        let published = match (self.staged.take(), self.destination.as_deref()) {
            (Some(staged), Some(destination)) => {
                Some(staged.publish(destination, self.name.as_deref())?)
            }
            (Some(staged), None) => {
                staged.remove()?;
                None
            }
            (None, _) => None,
        };

        let remove = self.remove_origin
            && !published_over_origin(published.as_deref(), self.source.origin_path());
        let origin_removed = remove && {
            let origin = self.source.to_string();
            match self.source.remove_origin() {
                Ok(()) => {
                    log::info!("removed original {origin}");
                    true
                }
                Err(e) => {
                    log::warn!("failed to remove original {origin}: {e}");
                    false
                }
            }
        };

        Ok(Finished {
            detail,
            published,
            resized: self.resized,
            origin_removed,
        })
    }

    fn fail(&mut self, err: HandleError) {
        log::debug!("{}: {err}", self.source);
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn inspect_source(&mut self) {
        let result = self
            .source
            .open()
            .map_err(HandleError::from)
            .and_then(|(mut reader, size)| detail::inspect(&self.backend, reader.as_mut(), size));

        match result {
            Ok(detail) => {
                log::debug!(
                    "inspected {}: {}x{} {} ({} bytes)",
                    self.source,
                    detail.width,
                    detail.height,
                    detail.mime,
                    detail.size
                );
                if let Source::Upload(upload) = &self.source {
                    if let Some(declared) = upload.content_type() {
                        if declared != detail.mime {
                            log::warn!(
                                "upload declared {declared} but content is {}",
                                detail.mime
                            );
                        }
                    }
                }
                self.detail = Some(detail);
            }
            Err(e) => self.fail(e),
        }
    }

    fn stage(&mut self) -> Result<(), HandleError> {
        let current = self.detail.as_ref().ok_or(HandleError::NotInspected)?;
        let extension = current
            .extension()
            .ok_or_else(|| HandleError::UnsupportedFormat(current.mime.clone()))?;

        if let Some(name) = &self.name {
            if !is_plain_file_name(name) {
                return Err(HandleError::InvalidName(name.clone()));
            }
        }

        let (staged, mut file) = StagedFile::create(&self.config.staging_dir(), extension)?;

        let (mut reader, size) = self.source.open()?;
        let copied = copy_chunked(reader.as_mut(), &mut file, size, self.config.chunk_size)?;
        drop(reader);
        drop(file);

        if copied != size {
            return Err(HandleError::SizeMismatch {
                expected: size,
                copied,
            });
        }
        log::info!(
            "staged {} → {} ({copied} bytes)",
            self.source,
            staged.path().display()
        );

        self.detail = Some(detail::inspect_path(&self.backend, staged.path())?);
        self.staged = Some(staged);
        Ok(())
    }

    fn apply_resize(&mut self, options: &ResizeOptions) -> Result<(), HandleError> {
        let current = self.detail.as_ref().ok_or(HandleError::NotInspected)?;
        let staged = self.staged.as_ref().ok_or(HandleError::NotInspected)?;

        let encoding = Encoding::for_mime(&current.mime, &self.quality)
            .ok_or_else(|| HandleError::UnsupportedFormat(current.mime.clone()))?;
        let (width, height) = options.target_dimensions((current.width, current.height));
        check_pixel_budget(
            (current.width, current.height),
            (width, height),
            options.anchor.is_some(),
            self.config.max_pixels,
        )?;

        log::info!(
            "resizing {} from {}x{} to {width}x{height}",
            staged.path().display(),
            current.width,
            current.height
        );
        self.backend.transform(&TransformParams {
            path: staged.path().to_path_buf(),
            width,
            height,
            anchor: options.anchor,
            encoding,
        })?;

        self.detail = Some(detail::inspect_path(&self.backend, staged.path())?);
        Ok(())
    }
}

/// Reject targets whose working buffer would exceed `max_pixels`.
///
/// An anchored fill resizes to the covering size before cropping, so that
/// intermediate size is checked too.
fn check_pixel_budget(
    source: (u32, u32),
    target: (u32, u32),
    anchored: bool,
    max_pixels: u64,
) -> Result<(), HandleError> {
    let working = if anchored {
        calculate_fill_dimensions(source, target)
    } else {
        target
    };
    for (w, h) in [target, working] {
        let pixels = u64::from(w) * u64::from(h);
        if pixels > max_pixels {
            return Err(HandleError::InvalidResize(format!(
                "{w}x{h} exceeds the limit of {max_pixels} pixels"
            )));
        }
    }
    Ok(())
}

/// True when publishing replaced the original file itself.
fn published_over_origin(published: Option<&Path>, origin: Option<&Path>) -> bool {
    match (published, origin) {
        (Some(p), Some(o)) => match (fs::canonicalize(p), fs::canonicalize(o)) {
            (Ok(p), Ok(o)) => p == o,
            _ => p == o,
        },
        _ => false,
    }
}
