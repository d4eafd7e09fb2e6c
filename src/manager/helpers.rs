//! Template helpers exported to the page renderer.

use super::AssetManager;
use crate::error::AssetError;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Name under which the path resolver is registered.
pub const PATH_FOR_KEY: &str = "pathFor";

/// `logical path → fingerprinted serving path`, callable from templates.
pub type PathFor = Arc<dyn Fn(&str) -> Result<String, AssetError> + Send + Sync>;

/// Helper table for a template engine, keyed by helper name.
pub fn helpers(manager: Arc<AssetManager>) -> FxHashMap<&'static str, PathFor> {
    let path_for: PathFor = Arc::new(move |logical: &str| manager.path_for(logical));
    let mut table = FxHashMap::default();
    table.insert(PATH_FOR_KEY, path_for);
    table
}
