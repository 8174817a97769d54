//! The storage substrate behind the responder.
//!
//! [`FileSystem`] is the seam to the platform's storage primitives;
//! [`LocalFileSystem`] implements it with `tokio::fs` for hosts where the
//! target application's storage is a regular directory tree. Tests substitute
//! their own implementations the same way.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use std::io;
use std::path::PathBuf;

use super::error::ExplorerError;
use super::{FileStat, RootDirectories};

/// Storage primitives the responder drives.
///
/// Every method suspends the calling handler until the operation completes.
/// Implementations report a stat of a missing path as a successful
/// `FileStat { exists: false, .. }`; only genuine I/O failures are errors.
#[async_trait]
pub trait FileSystem: Send + Sync + 'static {
    /// Lists the names of the entries directly inside `path`.
    async fn read_dir(&self, path: &Utf8Path) -> Result<Vec<String>, ExplorerError>;

    /// Retrieves metadata for a single path.
    async fn stat(&self, path: &Utf8Path) -> Result<FileStat, ExplorerError>;

    /// Reads a file's full content.
    async fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, ExplorerError>;

    /// Writes `contents` to `path`, replacing any existing file.
    async fn write(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), ExplorerError>;

    /// Deletes `path`; directories are removed recursively.
    async fn remove(&self, path: &Utf8Path) -> Result<(), ExplorerError>;

    /// Creates a directory at `path`, including missing intermediate
    /// directories.
    async fn create_dir_all(&self, path: &Utf8Path) -> Result<(), ExplorerError>;

    /// The three well-known root locations, fixed for the session.
    fn root_directories(&self) -> RootDirectories;
}

/// Production implementation over the local file system.
pub struct LocalFileSystem {
    roots: RootDirectories,
}

impl LocalFileSystem {
    pub fn new(roots: RootDirectories) -> Self {
        Self { roots }
    }

    /// Resolves the three roots from the platform's standard directories for
    /// `app_name`. Returns `None` when the platform exposes no such
    /// directories or a resolved path is not valid UTF-8.
    pub fn with_platform_roots(app_name: &str) -> Option<Self> {
        let document = dirs::data_dir()?.join(app_name).join("files");
        let cache = dirs::cache_dir()?.join(app_name);
        let bundle = std::env::current_exe().ok()?.parent()?.to_path_buf();

        let to_utf8 = |path: PathBuf| Utf8PathBuf::from_path_buf(path).ok();
        Some(Self::new(RootDirectories {
            document: to_utf8(document)?,
            cache: to_utf8(cache)?,
            bundle: to_utf8(bundle)?,
        }))
    }
}

fn io_error(path: &Utf8Path) -> impl FnOnce(io::Error) -> ExplorerError + '_ {
    move |source| ExplorerError::Io(source, path.to_owned())
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_dir(&self, path: &Utf8Path) -> Result<Vec<String>, ExplorerError> {
        let mut reader = tokio::fs::read_dir(path.as_std_path())
            .await
            .map_err(io_error(path))?;

        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(io_error(path))? {
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => return Err(ExplorerError::NonUtf8Path(PathBuf::from(raw))),
            }
        }
        names.sort_unstable();
        Ok(names)
    }

    async fn stat(&self, path: &Utf8Path) -> Result<FileStat, ExplorerError> {
        match tokio::fs::metadata(path.as_std_path()).await {
            Ok(metadata) => {
                let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
                Ok(FileStat {
                    exists: true,
                    is_directory: metadata.is_dir(),
                    size: metadata.len(),
                    modified,
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileStat::missing()),
            Err(e) => Err(ExplorerError::Io(e, path.to_owned())),
        }
    }

    async fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, ExplorerError> {
        tokio::fs::read(path.as_std_path())
            .await
            .map_err(io_error(path))
    }

    async fn write(&self, path: &Utf8Path, contents: &[u8]) -> Result<(), ExplorerError> {
        tokio::fs::write(path.as_std_path(), contents)
            .await
            .map_err(io_error(path))
    }

    async fn remove(&self, path: &Utf8Path) -> Result<(), ExplorerError> {
        let metadata = tokio::fs::metadata(path.as_std_path())
            .await
            .map_err(io_error(path))?;

        if metadata.is_dir() {
            tokio::fs::remove_dir_all(path.as_std_path())
                .await
                .map_err(io_error(path))
        } else {
            tokio::fs::remove_file(path.as_std_path())
                .await
                .map_err(io_error(path))
        }
    }

    async fn create_dir_all(&self, path: &Utf8Path) -> Result<(), ExplorerError> {
        tokio::fs::create_dir_all(path.as_std_path())
            .await
            .map_err(io_error(path))
    }

    fn root_directories(&self) -> RootDirectories {
        self.roots.clone()
    }
}
