//! Mirroring files from the source tree into the output tree.

use super::SyncError;
use crate::utils::path::is_ignored;
use jwalk::WalkDir;
use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

/// Outcome of one copy pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    /// Files whose destination was (re)written
    pub copied: usize,
    /// Files whose destination already held identical bytes
    pub unchanged: usize,
}

impl CopyStats {
    pub const fn total(&self) -> usize {
        self.copied + self.unchanged
    }
}

impl AddAssign for CopyStats {
    fn add_assign(&mut self, rhs: Self) {
        self.copied += rhs.copied;
        self.unchanged += rhs.unchanged;
    }
}

/// Destination of `path` when `input` is mirrored into `output`.
///
/// Returns `None` for paths outside `input` and for ignored paths
/// (hidden components, editor artifacts).
pub fn mirror_path(input: &Path, output: &Path, path: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(input).ok()?;
    if relative.as_os_str().is_empty() || is_ignored(relative) {
        return None;
    }
    Some(output.join(relative))
}

/// Mirror every regular file below `from` (a directory inside `input`).
///
/// Stops at the first failure.
pub fn copy_tree(input: &Path, output: &Path, from: &Path) -> Result<CopyStats, SyncError> {
    let mut stats = CopyStats::default();

    for entry in WalkDir::new(from).skip_hidden(false).sort(true) {
        let entry = entry.map_err(|err| SyncError::Walk {
            path: from.to_path_buf(),
            source: io::Error::other(err.to_string()),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let src = entry.path();
        let Some(dest) = mirror_path(input, output, &src) else {
            continue;
        };
        if copy_file(&src, &dest)? {
            stats.copied += 1;
        } else {
            stats.unchanged += 1;
        }
    }

    Ok(stats)
}

/// Copy `src` over `dest`, creating parent directories.
///
/// Returns `Ok(false)` without touching `dest` when it already holds the
/// same bytes, or when `src` vanished before it could be read.
pub fn copy_file(src: &Path, dest: &Path) -> Result<bool, SyncError> {
    let copy_err = |source| SyncError::Copy {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };

    let bytes = match fs::read(src) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(copy_err(err)),
    };

    if fs::read(dest).is_ok_and(|existing| existing == bytes) {
        return Ok(false);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(copy_err)?;
    }
    write_atomic(dest, &bytes).map_err(copy_err)?;
    Ok(true)
}

/// Write through a sibling temp file and rename, so concurrent readers of
/// `dest` see either the old or the new bytes, never a partial file.
fn write_atomic(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let name = dest
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".assetkit-tmp");
    let tmp = dest.with_file_name(tmp_name);

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, dest).inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}
