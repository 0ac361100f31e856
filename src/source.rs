//! Input sources an [`ImageHandle`](crate::ImageHandle) can wrap.
//!
//! | Source | Size from | Origin removal |
//! |---|---|---|
//! | [`Source::Path`] | file metadata | delete the file |
//! | [`Source::Upload`] | [`Upload::size`] | [`Upload::discard`] |
//! | [`Source::File`] | handle metadata | close the handle, delete its path |
//!
//! Uploads are abstracted behind the [`Upload`] trait so any multipart parser
//! can plug in. Two implementations ship here: [`MemoryUpload`] for parts held
//! in memory and [`DiskUpload`] for parts the parser spooled to disk.

use crate::imaging::ReadSeek;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Cursor, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// One file part of a multipart upload.
pub trait Upload {
    /// File name the client sent, if any. Informational only.
    fn file_name(&self) -> Option<&str>;

    /// Content type the client declared, if any. Informational only.
    fn content_type(&self) -> Option<&str>;

    /// Size of the part in bytes.
    fn size(&self) -> u64;

    /// Open the part for reading from the start.
    fn open(&self) -> io::Result<Box<dyn ReadSeek + '_>>;

    /// Release the part's backing storage.
    fn discard(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An upload part held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUpload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl MemoryUpload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl Upload for MemoryUpload {
    fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn open(&self) -> io::Result<Box<dyn ReadSeek + '_>> {
        Ok(Box::new(Cursor::new(self.bytes.as_slice())))
    }

    fn discard(&mut self) -> io::Result<()> {
        self.bytes = Vec::new();
        Ok(())
    }
}

/// An upload part spooled to a file by the multipart parser.
#[derive(Debug, Clone)]
pub struct DiskUpload {
    path: PathBuf,
    size: u64,
    file_name: Option<String>,
    content_type: Option<String>,
}

impl DiskUpload {
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let size = fs::metadata(&path)?.len();
        Ok(Self {
            path,
            size,
            file_name: None,
            content_type: None,
        })
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Upload for DiskUpload {
    fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn open(&self) -> io::Result<Box<dyn ReadSeek + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn discard(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Exactly one input for a handle.
pub enum Source {
    Path(PathBuf),
    Upload(Box<dyn Upload>),
    /// An already-open file and the path it was opened from.
    File { file: File, path: PathBuf },
}

impl Source {
    /// Open the input from its first byte, along with its size.
    pub fn open(&mut self) -> io::Result<(Box<dyn ReadSeek + '_>, u64)> {
        match self {
            Source::Path(path) => {
                let file = File::open(path.as_path())?;
                let size = file.metadata()?.len();
                Ok((Box::new(file), size))
            }
            Source::Upload(upload) => {
                let size = upload.size();
                Ok((upload.open()?, size))
            }
            Source::File { file, .. } => {
                file.seek(SeekFrom::Start(0))?;
                let size = file.metadata()?.len();
                Ok((Box::new(file), size))
            }
        }
    }

    /// Filesystem path of the original input, if it has one.
    pub fn origin_path(&self) -> Option<&Path> {
        match self {
            Source::Path(path) | Source::File { path, .. } => Some(path.as_path()),
            Source::Upload(_) => None,
        }
    }

    /// Delete (or release) the original input, consuming the source.
    pub fn remove_origin(self) -> io::Result<()> {
        match self {
            Source::Path(path) => fs::remove_file(path),
            Source::File { file, path } => {
                drop(file);
                fs::remove_file(path)
            }
            Source::Upload(mut upload) => upload.discard(),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Upload(upload) => f
                .debug_struct("Upload")
                .field("file_name", &upload.file_name())
                .field("size", &upload.size())
                .finish(),
            Source::File { path, .. } => f.debug_struct("File").field("path", path).finish(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Upload(upload) => {
                write!(f, "upload '{}'", upload.file_name().unwrap_or("<unnamed>"))
            }
            Source::File { path, .. } => write!(f, "open file {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_all(source: &mut Source) -> (Vec<u8>, u64) {
        let (mut reader, size) = source.open().unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        (out, size)
    }

    #[test]
    fn path_source_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("in.bin");
        fs::write(&path, b"abcdef").unwrap();

        let mut source = Source::Path(path.clone());
        assert_eq!(read_all(&mut source), (b"abcdef".to_vec(), 6));
        assert_eq!(source.origin_path(), Some(path.as_path()));
    }

    #[test]
    fn file_source_rewinds_between_opens() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("in.bin");
        fs::write(&path, b"0123456789").unwrap();

        let mut source = Source::File {
            file: File::open(&path).unwrap(),
            path,
        };
        assert_eq!(read_all(&mut source).0, b"0123456789");
        assert_eq!(read_all(&mut source).0, b"0123456789");
    }

    #[test]
    fn memory_upload_reports_size_and_metadata() {
        let upload = MemoryUpload::new(vec![1, 2, 3])
            .with_file_name("cat.png")
            .with_content_type("image/png");
        assert_eq!(upload.size(), 3);
        assert_eq!(upload.file_name(), Some("cat.png"));
        assert_eq!(upload.content_type(), Some("image/png"));

        let mut source = Source::Upload(Box::new(upload));
        assert_eq!(read_all(&mut source), (vec![1, 2, 3], 3));
        assert_eq!(source.origin_path(), None);
        assert_eq!(source.to_string(), "upload 'cat.png'");
    }

    #[test]
    fn disk_upload_discard_removes_spool_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let spool = tmp.path().join("multipart-123");
        fs::write(&spool, b"part").unwrap();

        let upload = DiskUpload::new(&spool).unwrap();
        assert_eq!(upload.size(), 4);

        Source::Upload(Box::new(upload)).remove_origin().unwrap();
        assert!(!spool.exists());
    }

    #[test]
    fn remove_origin_deletes_path_and_file_sources() {
        let tmp = tempfile::TempDir::new().unwrap();
        let a = tmp.path().join("a.png");
        let b = tmp.path().join("b.png");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        Source::Path(a.clone()).remove_origin().unwrap();
        Source::File {
            file: File::open(&b).unwrap(),
            path: b.clone(),
        }
        .remove_origin()
        .unwrap();

        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn remove_origin_missing_path_errors() {
        let result = Source::Path("/nonexistent/origin.png".into()).remove_origin();
        assert!(result.is_err());
    }
}
