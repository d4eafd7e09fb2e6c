//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `sanitize` - `/`-separated logical asset paths
//! - `extension` / `split_dir` - pure string helpers for logical paths

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// For paths that do not exist yet:
/// - Join with current directory if relative
/// - Drop `.` and fold `..` lexically
/// - Canonicalize the deepest existing ancestor and re-append the rest
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    let cleaned = clean_lexically(&absolute);
    canonicalize_existing(&cleaned).unwrap_or(cleaned)
}

fn clean_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn canonicalize_existing(path: &Path) -> Option<PathBuf> {
    let mut missing = Vec::new();
    let mut base = path;
    loop {
        if let Ok(canonical) = base.canonicalize() {
            return Some(missing.iter().rev().fold(canonical, |acc, part| acc.join(part)));
        }
        missing.push(base.file_name()?);
        base = base.parent()?;
    }
}

/// Validate a logical asset path relative to an asset root.
///
/// Returns `None` for anything that could address a file outside the root
/// or that has no file name: empty paths, absolute paths, empty segments,
/// hidden segments (which covers `.` and `..`), backslashes and NUL bytes.
pub fn sanitize(path: &str) -> Option<&str> {
    if path.is_empty() || path.starts_with('/') || path.contains(['\\', '\0']) {
        return None;
    }
    let valid = path
        .split('/')
        .all(|segment| !segment.is_empty() && !segment.starts_with('.'));
    valid.then_some(path)
}

/// Extension of the last segment of a logical path, without the dot.
///
/// Dotfiles such as `.env` have no extension.
pub fn extension(path: &str) -> Option<&str> {
    let (_, base) = split_dir(path);
    match base.rfind('.') {
        Some(0) | None => None,
        Some(i) => Some(&base[i + 1..]),
    }
}

/// Split a logical path into `(directory, basename)`.
///
/// `"js/app/main.js"` → `("js/app", "main.js")`, `"main.js"` → `("", "main.js")`
pub fn split_dir(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    }
}

/// Convert a path relative to some root into a `/`-separated logical path.
pub fn to_logical(relative: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = relative.iter().map(|c| c.to_str()).collect();
    let joined = parts?.join("/");
    (!joined.is_empty()).then_some(joined)
}

/// Check if a root-relative path should be left out of walks: any hidden
/// component, or an editor artifact as the file name.
pub fn is_ignored(relative: &Path) -> bool {
    relative
        .iter()
        .any(|c| c.to_str().is_none_or(|s| s.starts_with('.')))
        || is_temp_file(relative)
}

/// Check if path is a temp/backup file (editor artifacts).
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
