//! Source tree → synchronizer → live tree → manager.

mod common;

use std::fs;
use std::time::Duration;

use assetkit::fs::{Denylist, LiveFs};
use assetkit::manager::AssetManager;
use assetkit::sync::TreeSynchronizer;
use common::{eventually, write};
use tempfile::TempDir;

#[test]
fn edits_reach_new_urls() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("assets");
    let output = temp.path().join("public");
    write(&input, "js/main.js", "AAA");

    let handle = TreeSynchronizer::new(&input, &output)
        .with_debounce(Duration::from_millis(20))
        .spawn()
        .unwrap();

    let manager = AssetManager::new(Box::new(LiveFs::new(&output, Denylist::default())), "public");
    let before = manager.path_for("js/main.js").unwrap();

    write(&input, "js/main.js", "BBBB");
    assert!(eventually(|| manager.path_for("js/main.js").is_ok_and(|p| p != before)));
    assert_eq!(&*manager.read_all("public/js/main.js").unwrap(), b"BBBB");

    write(&input, "css/site.css", "a{}");
    assert!(eventually(|| manager.path_for("css/site.css").is_ok()));

    handle.stop();
}

#[test]
fn copy_all_converges_once() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("assets");
    let output = temp.path().join("public");
    write(&input, "main.js", "AAA");
    write(&input, "img/icons/logo.svg", "<svg/>");
    write(&input, ".cache/junk", "x");

    let sync = TreeSynchronizer::new(&input, &output);
    assert_eq!(sync.copy_all().unwrap().copied, 2);
    assert_eq!(sync.copy_all().unwrap().copied, 0);

    assert_eq!(fs::read_to_string(output.join("img/icons/logo.svg")).unwrap(), "<svg/>");
    assert!(!output.join(".cache").exists());
}
