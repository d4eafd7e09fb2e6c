//! The asset manager: a filesystem view plus its fingerprint index.
//!
//! Page rendering asks [`AssetManager::path_for`] for cache-busted URLs;
//! the HTTP layer routes `/<prefix>/*` to [`AssetManager::handle`].

mod helpers;
mod response;

pub use helpers::{PATH_FOR_KEY, PathFor, helpers};
pub use response::AssetResponse;

use crate::config::AssetsConfig;
use crate::error::AssetError;
use crate::fingerprint::{Entry, FingerprintIndex, normalize};
use crate::fs::{self, AssetFs, AssetReader, Mode};
use std::borrow::Cow;

pub struct AssetManager {
    fs: Box<dyn AssetFs>,
    index: FingerprintIndex,
}

impl AssetManager {
    /// Build a manager over `fs`, serving under `prefix`.
    ///
    /// Index entries are revalidated on every lookup when `fs` is live.
    pub fn new(fs: Box<dyn AssetFs>, prefix: &str) -> Self {
        let index = FingerprintIndex::new(prefix, fs.mode().is_live());
        Self { fs, index }
    }

    pub fn from_config(config: &AssetsConfig, mode: Mode) -> Result<Self, AssetError> {
        let fs = fs::select(mode, &config.root, config.denylist())?;
        Ok(Self::new(fs, &config.prefix))
    }

    /// Fingerprinted serving path for a logical asset path.
    ///
    /// `main.js`, `/main.js`, `public/main.js` and `/public/main.js` all
    /// resolve to the same `/public/<token>-main.js`.
    pub fn path_for(&self, logical: &str) -> Result<String, AssetError> {
        self.index.resolve(self.fs.as_ref(), logical)
    }

    pub fn entry(&self, logical: &str) -> Result<Entry, AssetError> {
        self.index.entry(self.fs.as_ref(), logical)
    }

    pub fn open(&self, logical: &str) -> Result<AssetReader<'_>, AssetError> {
        self.fs.open(self.normalize(logical))
    }

    pub fn read_all(&self, logical: &str) -> Result<Cow<'_, [u8]>, AssetError> {
        self.fs.read_all(self.normalize(logical))
    }

    /// Route pattern the HTTP router should hand to [`AssetManager::handle`].
    pub fn handler_pattern(&self) -> String {
        match self.prefix() {
            "" => "/*".to_string(),
            prefix => format!("/{prefix}/*"),
        }
    }

    pub fn prefix(&self) -> &str {
        self.index.prefix()
    }

    pub fn mode(&self) -> Mode {
        self.fs.mode()
    }

    pub fn index(&self) -> &FingerprintIndex {
        &self.index
    }

    fn normalize<'a>(&self, logical: &'a str) -> &'a str {
        normalize(logical, self.prefix())
    }
}
