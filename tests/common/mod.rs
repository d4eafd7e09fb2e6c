#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use assetkit::fs::{Denylist, SnapshotFs};
use assetkit::manager::AssetManager;

/// `main.js` and `other/main.js` with identical bytes, plus a denied file.
pub fn scenario_manager() -> AssetManager {
    let snapshot = SnapshotFs::from_entries(
        [
            ("main.js", b"AAA".to_vec()),
            ("other/main.js", b"AAA".to_vec()),
            ("server.go", b"package main".to_vec()),
        ],
        Denylist::default(),
    );
    AssetManager::new(Box::new(snapshot), "public")
}

pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Poll `check` until it holds or a few seconds pass.
pub fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}
