//! Disk-backed asset filesystem for development.

use super::{AssetFs, AssetReader, Denylist, ModSignal, Mode};
use crate::error::AssetError;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Asset filesystem rooted at a directory.
///
/// Nothing is cached: every call goes to disk, so files rewritten by the
/// synchronizer are visible to the very next request.
#[derive(Debug, Clone)]
pub struct LiveFs {
    root: PathBuf,
    deny: Denylist,
}

impl LiveFs {
    pub fn new(root: impl Into<PathBuf>, deny: Denylist) -> Self {
        Self {
            root: root.into(),
            deny,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a logical path to a regular file under the root.
    fn locate(&self, path: &str) -> Result<(PathBuf, fs::Metadata), AssetError> {
        let logical = self.deny.admit(path)?;
        let full = self.root.join(logical);
        let meta = fs::metadata(&full).map_err(|err| AssetError::from_io(path, full.clone(), err))?;
        if !meta.is_file() {
            return Err(AssetError::not_found(path));
        }
        Ok((full, meta))
    }
}

impl AssetFs for LiveFs {
    fn open(&self, path: &str) -> Result<AssetReader<'_>, AssetError> {
        let (full, _) = self.locate(path)?;
        let file = File::open(&full).map_err(|err| AssetError::from_io(path, full, err))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn read_all(&self, path: &str) -> Result<Cow<'_, [u8]>, AssetError> {
        let (full, _) = self.locate(path)?;
        fs::read(&full)
            .map(Cow::Owned)
            .map_err(|err| AssetError::from_io(path, full, err))
    }

    fn signal(&self, path: &str) -> Result<ModSignal, AssetError> {
        let (_, meta) = self.locate(path)?;
        Ok(ModSignal::Stamp {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }

    fn mode(&self) -> Mode {
        Mode::Development
    }
}
