//! Tree synchronization errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source directory `{}` does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to create file watcher")]
    Watcher(#[source] notify::Error),

    #[error("failed to watch `{}`", path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("failed to walk `{}`", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy `{}` to `{}`", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SyncError {
    /// Errors that prevent the watch loop from starting at all.
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::MissingInput(_) | Self::Watcher(_) | Self::Watch { .. })
    }
}
