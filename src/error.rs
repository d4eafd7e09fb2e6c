//! Asset lookup errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by asset lookups and path resolution.
///
/// `NotFound` covers missing files, denylisted extensions and paths that
/// try to leave the asset root; the HTTP layer turns it into a 404.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: `{0}`")]
    NotFound(String),

    #[error("IO error when reading `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AssetError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Map an IO error, folding `ErrorKind::NotFound` into [`AssetError::NotFound`].
    pub fn from_io(logical: &str, path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::not_found(logical),
            _ => Self::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
