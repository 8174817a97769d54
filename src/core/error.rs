//! The error type shared by the storage substrate and the pure helpers.

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by storage operations, content transcoding, and path
/// normalization.
///
/// Every variant carries enough context to be textified into an `error`
/// reply; none of them is fatal to an endpoint.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// An I/O failure from the underlying file system.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, Utf8PathBuf),

    /// Uploaded or downloaded content was not valid base64.
    #[error("invalid base64 content: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The file system produced a name that is not valid UTF-8 and cannot be
    /// represented on the JSON wire.
    #[error("path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),

    /// A path handed to the breadcrumb normalizer was not under the given
    /// root. Never silently truncated; callers decide how to render it.
    #[error("path '{path}' is not under root '{root}'")]
    NotUnderRoot { path: String, root: String },
}
