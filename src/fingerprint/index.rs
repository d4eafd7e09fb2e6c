//! Logical path → fingerprinted path cache.

use super::hash::{Token, hash};
use super::path::{normalize, normalize_prefix, serving_path};
use crate::error::AssetError;
use crate::fs::{AssetFs, ModSignal};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use std::sync::Arc;

/// One resolved asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub serving_path: Arc<str>,
    pub token: Token,
    pub signal: ModSignal,
}

/// Thread-safe fingerprint cache owned by an asset manager.
///
/// Entries are computed lazily on first lookup. With `revalidate` set
/// (live filesystems) every hit re-checks the file's modification signal
/// and recomputes when it moved; otherwise an entry is final.
///
/// Disk reads and hashing happen with no map lock held. Concurrent first
/// lookups of the same path may both compute; the first insert wins.
#[derive(Debug)]
pub struct FingerprintIndex {
    prefix: String,
    revalidate: bool,
    entries: DashMap<String, Entry>,
}

impl FingerprintIndex {
    pub fn new(prefix: &str, revalidate: bool) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
            revalidate,
            entries: DashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve a logical path to its serving path.
    pub fn resolve(&self, fs: &dyn AssetFs, logical: &str) -> Result<String, AssetError> {
        self.entry(fs, logical)
            .map(|entry| entry.serving_path.to_string())
    }

    /// Look up (or compute) the full entry for a logical path.
    pub fn entry(&self, fs: &dyn AssetFs, logical: &str) -> Result<Entry, AssetError> {
        self.entry_normalized(fs, normalize(logical, &self.prefix))
    }

    /// Like [`FingerprintIndex::entry`] for a key that is already
    /// prefix-relative; no further prefix segment is stripped.
    pub fn entry_normalized(&self, fs: &dyn AssetFs, key: &str) -> Result<Entry, AssetError> {
        if let Some(cached) = self.cached(fs, key)? {
            return Ok(cached);
        }

        let fresh = self.compute(fs, key)?;
        Ok(self.store(key, fresh))
    }

    /// Cached entry for `key` if it is still current.
    fn cached(&self, fs: &dyn AssetFs, key: &str) -> Result<Option<Entry>, AssetError> {
        // Clone out so the shard guard is released before touching the disk.
        let Some(cached) = self.entries.get(key).map(|entry| entry.clone()) else {
            return Ok(None);
        };
        if !self.revalidate {
            return Ok(Some(cached));
        }

        match fs.signal(key) {
            Ok(signal) if signal == cached.signal => Ok(Some(cached)),
            Ok(_) => Ok(None),
            Err(err) => {
                if err.is_not_found() {
                    self.entries.remove(key);
                }
                Err(err)
            }
        }
    }

    fn compute(&self, fs: &dyn AssetFs, key: &str) -> Result<Entry, AssetError> {
        // Signal first: if the file changes mid-read the stored signal is
        // stale and the next lookup recomputes.
        let signal = fs.signal(key)?;
        let bytes = fs.read_all(key)?;
        let token = hash(&bytes);
        let entry = Entry {
            serving_path: serving_path(&self.prefix, key, token).into(),
            token,
            signal,
        };
        crate::debug!("asset"; "{} -> {}", key, entry.serving_path);
        Ok(entry)
    }

    fn store(&self, key: &str, fresh: Entry) -> Entry {
        match self.entries.entry(key.to_string()) {
            MapEntry::Vacant(slot) => slot.insert(fresh).value().clone(),
            MapEntry::Occupied(mut slot) => {
                if self.revalidate && slot.get().signal != fresh.signal {
                    slot.insert(fresh.clone());
                    fresh
                } else {
                    slot.get().clone()
                }
            }
        }
    }

    /// Drop the cached entry for a logical path.
    pub fn invalidate(&self, logical: &str) {
        self.entries.remove(normalize(logical, &self.prefix));
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
