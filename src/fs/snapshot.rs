//! Immutable in-memory asset filesystem.

use super::{AssetFs, AssetReader, Denylist, ModSignal, Mode};
use crate::error::AssetError;
use crate::utils::path::{is_ignored, to_logical};
use jwalk::WalkDir;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

/// Frozen set of asset files.
///
/// Contents never change after construction, so every lookup is a map read
/// and returns byte-identical results for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct SnapshotFs {
    files: FxHashMap<String, Box<[u8]>>,
    deny: Denylist,
}

impl SnapshotFs {
    /// Build a snapshot from `(logical path, bytes)` pairs.
    pub fn from_entries<I, P, B>(entries: I, deny: Denylist) -> Self
    where
        I: IntoIterator<Item = (P, B)>,
        P: Into<String>,
        B: Into<Box<[u8]>>,
    {
        let files = entries
            .into_iter()
            .map(|(path, bytes)| (path.into(), bytes.into()))
            .collect();
        Self { files, deny }
    }

    /// Freeze the current contents of `dir`.
    ///
    /// Denylisted, hidden and editor temp files are left out since they can
    /// never be served.
    pub fn capture(dir: &Path, deny: Denylist) -> Result<Self, AssetError> {
        if !dir.is_dir() {
            return Err(AssetError::Io {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "asset root is not a directory"),
            });
        }

        let mut files = FxHashMap::default();
        for entry in WalkDir::new(dir).skip_hidden(false).sort(true) {
            let entry = entry.map_err(|err| AssetError::Io {
                path: dir.to_path_buf(),
                source: std::io::Error::other(err.to_string()),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(relative) = path.strip_prefix(dir).ok() else {
                continue;
            };
            if is_ignored(relative) {
                continue;
            }
            let Some(logical) = to_logical(relative) else {
                continue;
            };
            if deny.is_denied(&logical) {
                continue;
            }

            let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
                path: path.clone(),
                source,
            })?;
            files.insert(logical, bytes.into_boxed_slice());
        }

        crate::debug!("asset"; "captured {} files from {}", files.len(), dir.display());
        Ok(Self { files, deny })
    }

    /// Freeze a bundle embedded into the binary with `rust-embed`.
    pub fn from_embed<E: rust_embed::RustEmbed>(deny: Denylist) -> Self {
        let files = E::iter()
            .filter_map(|name| {
                let file = E::get(&name)?;
                Some((name.into_owned(), file.data.into_owned().into_boxed_slice()))
            })
            .collect();
        Self { files, deny }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Logical paths in the snapshot, unordered.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    fn lookup(&self, path: &str) -> Result<&[u8], AssetError> {
        let path = self.deny.admit(path)?;
        self.files
            .get(path)
            .map(|bytes| &**bytes)
            .ok_or_else(|| AssetError::not_found(path))
    }
}

impl AssetFs for SnapshotFs {
    fn open(&self, path: &str) -> Result<AssetReader<'_>, AssetError> {
        Ok(Box::new(Cursor::new(self.lookup(path)?)))
    }

    fn read_all(&self, path: &str) -> Result<Cow<'_, [u8]>, AssetError> {
        self.lookup(path).map(Cow::Borrowed)
    }

    fn signal(&self, path: &str) -> Result<ModSignal, AssetError> {
        self.lookup(path).map(|_| ModSignal::Frozen)
    }

    fn mode(&self) -> Mode {
        Mode::Production
    }
}
