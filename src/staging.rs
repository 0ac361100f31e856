//! Staging: copying an input into a private temp file.
//!
//! # Chunked copy
//!
//! [`copy_chunked`] moves bytes in `chunk_size` buffers so peak memory stays
//! bounded no matter how large the upload is. Inputs whose known size fits in
//! one chunk take a single read into an exactly-sized buffer and a single
//! write. Either way the loop runs until a zero-length read, so a wrong size
//! hint never truncates the copy.
//!
//! # Staged file lifetime
//!
//! A [`StagedFile`] always has a generated, unique name, so two handles (or
//! two processes) sharing a temp directory never touch each other's files.
//! A caller-chosen name is applied only when the file is published into its
//! destination. Dropping the guard deletes the file; only
//! [`StagedFile::publish`] hands it over. A handle that errors out, or is
//! simply dropped mid-chain, leaves nothing behind in the temp directory.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Default copy buffer size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Prefix for generated staging file names.
const STAGE_PREFIX: &str = "imgstage-";

/// Copy `reader` into `writer` in bounded chunks. Returns the bytes copied.
pub fn copy_chunked<R, W>(
    reader: &mut R,
    writer: &mut W,
    size_hint: u64,
    chunk_size: usize,
) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let chunk_size = chunk_size.max(1);
    let mut total = 0u64;

    if size_hint <= chunk_size as u64 {
        let mut buf = Vec::with_capacity(size_hint as usize);
        Read::take(&mut *reader, chunk_size as u64).read_to_end(&mut buf)?;
        writer.write_all(&buf)?;
        total += buf.len() as u64;
        if buf.len() < chunk_size {
            // Short of a full chunk means EOF was reached.
            writer.flush()?;
            return Ok(total);
        }
    }

    let mut buf = vec![0u8; chunk_size];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }

    writer.flush()?;
    Ok(total)
}

/// True when `name` is a bare file name that cannot escape its directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name)
}

/// `name` with `extension` appended unless it already ends in it.
pub fn file_name_with_extension(name: &str, extension: &str) -> String {
    let has_ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));
    if has_ext {
        name.to_string()
    } else {
        format!("{name}.{extension}")
    }
}

/// A uniquely named file in the staging directory.
///
/// Backed by a [`TempPath`], so the file is deleted when this value is
/// dropped unless [`publish`](Self::publish) moved it out first.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    extension: String,
}

impl StagedFile {
    /// Create an empty `imgstage-XXXXXX.<extension>` file in `dir`.
    ///
    /// The name is always freshly generated; an existing file is never
    /// opened or truncated.
    pub fn create(dir: &Path, extension: &str) -> io::Result<(Self, File)> {
        fs::create_dir_all(dir)?;
        let (file, path) = tempfile::Builder::new()
            .prefix(STAGE_PREFIX)
            .suffix(&format!(".{extension}"))
            .tempfile_in(dir)?
            .into_parts();
        log::debug!("staging file created at {}", path.display());
        Ok((
            Self {
                path,
                extension: extension.to_string(),
            },
            file,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Generated file name of the staged file.
    pub fn file_name(&self) -> &std::ffi::OsStr {
        self.path.file_name().unwrap_or_default()
    }

    /// File name the result gets in the destination: `name` plus the staged
    /// extension, or the generated name when `name` is `None`.
    pub fn published_name(&self, name: Option<&str>) -> PathBuf {
        match name {
            Some(name) => PathBuf::from(file_name_with_extension(name, &self.extension)),
            None => PathBuf::from(self.file_name()),
        }
    }

    /// Move the staged file into `destination_dir` as
    /// [`published_name`](Self::published_name).
    ///
    /// Falls back to copy + delete when a rename is not possible (e.g. the
    /// temp dir is on another filesystem).
    pub fn publish(self, destination_dir: &Path, name: Option<&str>) -> io::Result<PathBuf> {
        if let Some(name) = name {
            if !is_plain_file_name(name) {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("invalid file name '{name}'"),
                ));
            }
        }
        fs::create_dir_all(destination_dir)?;
        let target = destination_dir.join(self.published_name(name));

        if let Err(e) = self.path.persist(&target) {
            log::debug!("rename into {} failed ({}), copying", target.display(), e.error);
            // The returned TempPath still owns the staged file and removes it.
            fs::copy(&e.path, &target)?;
            e.path.close()?;
        }
        log::info!("published {}", target.display());
        Ok(target)
    }

    /// Delete the staged file now, reporting failures the drop would swallow.
    pub fn remove(self) -> io::Result<()> {
        self.path.close()
    }
}
