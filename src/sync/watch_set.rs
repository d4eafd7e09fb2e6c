use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

use super::SyncError;
use crate::utils::path::is_ignored;

/// Directories under supervision.
///
/// Every directory gets its own non-recursive watch. The set only grows:
/// a watched directory that disappears is left for the backend to drop.
pub(super) struct WatchSet {
    root: PathBuf,
    dirs: FxHashSet<PathBuf>,
}

impl WatchSet {
    pub(super) fn new(root: PathBuf) -> Self {
        Self {
            root,
            dirs: FxHashSet::default(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.dirs.len()
    }

    #[cfg(test)]
    pub(super) fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    /// Watch a single directory. Returns `false` if it was already watched.
    pub(super) fn attach<W: Watcher>(&mut self, watcher: &mut W, dir: &Path) -> Result<bool, SyncError> {
        if self.dirs.contains(dir) {
            return Ok(false);
        }
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| SyncError::Watch {
                path: dir.to_path_buf(),
                source,
            })?;
        self.dirs.insert(dir.to_path_buf());
        Ok(true)
    }

    /// Watch `dir` and every non-hidden directory below it.
    ///
    /// Returns the number of newly attached directories.
    pub(super) fn attach_tree<W: Watcher>(&mut self, watcher: &mut W, dir: &Path) -> Result<usize, SyncError> {
        let mut added = 0;

        for entry in WalkDir::new(dir).skip_hidden(false).sort(true) {
            let entry = entry.map_err(|err| SyncError::Walk {
                path: dir.to_path_buf(),
                source: io::Error::other(err.to_string()),
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let hidden = path
                .strip_prefix(&self.root)
                .is_ok_and(|relative| !relative.as_os_str().is_empty() && is_ignored(relative));
            if hidden {
                continue;
            }
            if self.attach(watcher, &path)? {
                added += 1;
            }
        }

        Ok(added)
    }
}
