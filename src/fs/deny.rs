//! Extension denylist and path guard shared by both filesystems.

use crate::error::AssetError;
use crate::utils::path::{extension, is_temp_file, sanitize};
use rustc_hash::FxHashSet;
use std::path::Path;

/// Extensions that are never served by default: source files that may sit
/// next to the assets they build.
pub const DEFAULT_DENIED: &[&str] = &["go", "rs"];

/// Set of file extensions that must never be served.
///
/// Matching is case-insensitive and ignores a leading dot, so `".GO"`
/// and `"go"` deny the same files.
#[derive(Debug, Clone)]
pub struct Denylist {
    extensions: FxHashSet<String>,
}

impl Denylist {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    /// A denylist that admits every extension.
    pub fn none() -> Self {
        Self {
            extensions: FxHashSet::default(),
        }
    }

    pub fn is_denied(&self, path: &str) -> bool {
        extension(path).is_some_and(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
    }

    /// Validate a logical path before it touches storage.
    ///
    /// Returns the path unchanged when it is safe to look up. Editor
    /// artifacts (`*.bak`, `*.swp`, `name~`) are refused like denied
    /// extensions, so both filesystems agree on what exists.
    pub fn admit<'a>(&self, path: &'a str) -> Result<&'a str, AssetError> {
        match sanitize(path) {
            Some(clean) if !self.is_denied(clean) && !is_temp_file(Path::new(clean)) => Ok(clean),
            _ => Err(AssetError::not_found(path)),
        }
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_DENIED)
    }
}
