//! End-to-end runs of the handle through the public API.
//!
//! Every test builds its own images in a `TempDir`, runs a full chain, and
//! checks what ends up on disk: the published file, the staging directory,
//! and the original input.

use image::{ImageFormat, Rgb, RgbImage};
use imgstage::{
    Anchor, DiskUpload, HandleError, ImageHandle, MemoryUpload, PngCompression, Quality,
    ResizeOptions, StageConfig,
};
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, encode(width, height, format)).unwrap();
    path
}

fn config_in(tmp: &TempDir) -> StageConfig {
    StageConfig {
        temp_dir: Some(tmp.path().join("staging")),
        ..StageConfig::default()
    }
}

fn staging_is_empty(tmp: &TempDir) -> bool {
    fs::read_dir(tmp.path().join("staging"))
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

#[test]
fn jpeg_path_resized_published_and_original_removed() {
    let tmp = TempDir::new().unwrap();
    let input = write_image(tmp.path(), "850x566.jpg", 850, 566, ImageFormat::Jpeg);
    let dest = tmp.path().join("public");

    let finished = ImageHandle::from_path(&input)
        .with_config(config_in(&tmp))
        .set_destination(&dest)
        .set_name("thumb")
        .set_quality(Quality::new(80))
        .resize(ResizeOptions::to_size(200, 0))
        .remove_origin(true)
        .finish()
        .unwrap();

    let published = dest.join("thumb.jpg");
    assert_eq!(finished.published.as_deref(), Some(published.as_path()));
    assert_eq!(finished.detail.mime, "image/jpeg");
    assert_eq!((finished.detail.width, finished.detail.height), (200, 133));
    assert_eq!(finished.detail.size, fs::metadata(&published).unwrap().len());
    assert!(finished.resized);
    assert!(finished.origin_removed);
    assert!(!input.exists());
    assert!(staging_is_empty(&tmp));
}

#[test]
fn upload_anchored_fill_produces_exact_box() {
    let tmp = TempDir::new().unwrap();
    let upload = MemoryUpload::new(encode(300, 200, ImageFormat::Png))
        .with_file_name("avatar.png")
        .with_content_type("image/png");

    let finished = ImageHandle::from_upload(upload)
        .with_config(config_in(&tmp))
        .set_destination(tmp.path().join("avatars"))
        .set_quality(PngCompression::Best)
        .resize(ResizeOptions::to_size(64, 64).anchor(Anchor::Center))
        .finish()
        .unwrap();

    let published = finished.published.unwrap();
    assert_eq!(published.extension().unwrap(), "png");
    assert_eq!(image::image_dimensions(&published).unwrap(), (64, 64));
    assert!(staging_is_empty(&tmp));
}

#[test]
fn ratio_resize_height_oriented() {
    let tmp = TempDir::new().unwrap();
    let input = write_image(tmp.path(), "in.png", 400, 200, ImageFormat::Png);

    let finished = ImageHandle::from_path(&input)
        .with_config(config_in(&tmp))
        .set_destination(tmp.path().join("out"))
        .resize(ResizeOptions::by_ratio(2).height_oriented())
        .finish()
        .unwrap();

    assert_eq!((finished.detail.width, finished.detail.height), (200, 100));
    assert!(input.exists(), "original kept unless requested");
}

#[test]
fn webp_upload_is_resized_with_the_native_encoder() {
    let tmp = TempDir::new().unwrap();
    let upload = MemoryUpload::new(encode(120, 80, ImageFormat::WebP)).with_file_name("pic.webp");

    let finished = ImageHandle::from_upload(upload)
        .with_config(config_in(&tmp))
        .set_destination(tmp.path().join("out"))
        .set_name("pic")
        .resize(ResizeOptions::to_size(60, 0))
        .finish()
        .unwrap();

    assert_eq!(finished.published, Some(tmp.path().join("out/pic.webp")));
    assert_eq!(finished.detail.mime, "image/webp");
    assert_eq!((finished.detail.width, finished.detail.height), (60, 40));
    assert!(staging_is_empty(&tmp));
}

#[test]
fn oversized_target_lands_in_the_error_slot() {
    let tmp = TempDir::new().unwrap();
    let upload = MemoryUpload::new(encode(8, 8, ImageFormat::Png));

    let err = ImageHandle::from_upload(upload)
        .with_config(config_in(&tmp))
        .set_destination(tmp.path().join("out"))
        .resize(ResizeOptions::to_size(u32::MAX, u32::MAX))
        .finish()
        .unwrap_err();

    assert!(matches!(err, HandleError::InvalidResize(_)));
    assert!(!tmp.path().join("out").exists());
    assert!(staging_is_empty(&tmp));
}

#[test]
fn open_file_source_is_staged_without_resize() {
    let tmp = TempDir::new().unwrap();
    let input = write_image(tmp.path(), "scan.gif", 30, 20, ImageFormat::Gif);
    let original = fs::read(&input).unwrap();

    let finished = ImageHandle::from_file(File::open(&input).unwrap(), &input)
        .with_config(config_in(&tmp))
        .set_destination(tmp.path().join("out"))
        .move_to_temp()
        .finish()
        .unwrap();

    let published = finished.published.unwrap();
    assert_eq!(published.extension().unwrap(), "gif");
    assert_eq!(fs::read(&published).unwrap(), original);
    assert!(!finished.resized);
}

#[test]
fn large_upload_is_copied_in_chunks_byte_for_byte() {
    let tmp = TempDir::new().unwrap();
    let spool = tmp.path().join("multipart-spool");
    let bytes = encode(500, 400, ImageFormat::Png);
    fs::write(&spool, &bytes).unwrap();

    let config = StageConfig {
        chunk_size: 1024,
        ..config_in(&tmp)
    };
    assert!(bytes.len() > config.chunk_size);

    let finished = ImageHandle::from_upload(DiskUpload::new(&spool).unwrap())
        .with_config(config)
        .set_destination(tmp.path().join("out"))
        .remove_origin(true)
        .finish()
        .unwrap();

    assert_eq!(fs::read(finished.published.unwrap()).unwrap(), bytes);
    assert!(finished.origin_removed);
    assert!(!spool.exists(), "spooled upload part discarded");
}

#[test]
fn conflicting_resize_options_fail_and_leave_everything_in_place() {
    let tmp = TempDir::new().unwrap();
    let input = write_image(tmp.path(), "in.png", 50, 50, ImageFormat::Png);

    let options = ResizeOptions {
        ratio: 2,
        height: 10,
        ..ResizeOptions::default()
    };
    let err = ImageHandle::from_path(&input)
        .with_config(config_in(&tmp))
        .set_destination(tmp.path().join("out"))
        .resize(options)
        .remove_origin(true)
        .finish()
        .unwrap_err();

    assert!(matches!(err, HandleError::InvalidResize(_)));
    assert!(err.to_string().contains("both ratio and resolution"));
    assert!(input.exists());
    assert!(!tmp.path().join("out").exists());
    assert!(staging_is_empty(&tmp));
}

#[test]
fn non_image_input_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("notes.jpg");
    fs::write(&input, "definitely not a jpeg").unwrap();

    let handle = ImageHandle::from_path(&input);
    assert!(matches!(handle.error(), Some(HandleError::NotAnImage(_))));

    let err = handle
        .set_destination(tmp.path().join("out"))
        .finish()
        .unwrap_err();
    assert!(matches!(err, HandleError::NotAnImage(_)));
}

#[test]
fn missing_destination_is_reported() {
    let upload = MemoryUpload::new(encode(10, 10, ImageFormat::Png));
    let err = ImageHandle::from_upload(upload)
        .resize(ResizeOptions::to_size(5, 5))
        .finish()
        .unwrap_err();

    assert_eq!(err.to_string(), "destination path is not set");
}
