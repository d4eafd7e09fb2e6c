use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use super::debouncer::{ChangeKind, Debouncer};
use super::watch_set::WatchSet;
use super::*;

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn make_trees() -> (TempDir, PathBuf, PathBuf) {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("assets");
    let output = temp.path().join("public");
    fs::create_dir_all(input.join("js")).unwrap();
    fs::write(input.join("js/main.js"), "AAA").unwrap();
    fs::write(input.join("site.css"), "a{}").unwrap();
    (temp, input, output)
}

fn fast(input: &Path, output: &Path) -> TreeSynchronizer {
    TreeSynchronizer::new(input, output).with_debounce(Duration::from_millis(20))
}

/// Poll until `path` holds `expected`, or give up after a few seconds.
fn wait_for(path: &Path, expected: &str) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if fs::read_to_string(path).is_ok_and(|s| s == expected) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

// ============================================================================
// Debouncer
// ============================================================================

#[test]
fn test_debouncer_empty() {
    let debouncer = Debouncer::new(Duration::ZERO);
    assert!(!debouncer.is_ready());
    assert!(debouncer.sleep_duration() >= Duration::from_secs(60));
}

#[test]
fn test_debouncer_created_wins() {
    let mut debouncer = Debouncer::new(Duration::ZERO);
    debouncer.add_event(&make_event(vec!["/in/a.js"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/in/a.js"], create_kind()));
    debouncer.add_event(&make_event(vec!["/in/a.js"], modify_kind()));

    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(debouncer.changes[&PathBuf::from("/in/a.js")], ChangeKind::Created);
}

#[test]
fn test_debouncer_ignores_noise() {
    let mut debouncer = Debouncer::new(Duration::ZERO);
    debouncer.add_event(&make_event(
        vec!["/in/a.js"],
        notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
            notify::event::MetadataKind::Any,
        )),
    ));
    debouncer.add_event(&make_event(
        vec!["/in/b.js"],
        notify::EventKind::Remove(notify::event::RemoveKind::File),
    ));
    debouncer.add_event(&make_event(vec!["/in/.a.js.swp", "/in/a.js~"], create_kind()));

    assert!(debouncer.changes.is_empty());
    assert!(!debouncer.is_ready());
}

#[test]
fn test_debouncer_waits_for_window() {
    let mut debouncer = Debouncer::new(Duration::from_secs(60));
    debouncer.add_event(&make_event(vec!["/in/a.js"], create_kind()));
    assert!(debouncer.take_if_ready().is_none());
    assert!(debouncer.sleep_duration() > Duration::from_secs(1));

    let mut debouncer = Debouncer::new(Duration::ZERO);
    debouncer.add_event(&make_event(vec!["/in/a.js", "/in/b.js"], modify_kind()));
    let changes = debouncer.take_if_ready().unwrap();
    assert_eq!(changes.len(), 2);
    assert!(debouncer.take_if_ready().is_none());
}

// ============================================================================
// Watch set
// ============================================================================

#[test]
fn test_watch_set_attach_tree() {
    let (_temp, input, _) = make_trees();
    fs::create_dir_all(input.join(".git/objects")).unwrap();
    let input = normalize_path(&input);

    let mut watcher = notify::recommended_watcher(|_: notify::Result<notify::Event>| {}).unwrap();
    let mut set = WatchSet::new(input.clone());

    assert_eq!(set.attach_tree(&mut watcher, &input).unwrap(), 2);
    assert!(set.contains(&input));
    assert!(set.contains(&input.join("js")));
    assert!(!set.contains(&input.join(".git")));

    // Monotonic: re-attaching adds nothing.
    assert_eq!(set.attach_tree(&mut watcher, &input).unwrap(), 0);
    assert!(!set.attach(&mut watcher, &input.join("js")).unwrap());
    assert_eq!(set.len(), 2);
}

// ============================================================================
// Synchronizer
// ============================================================================

#[test]
fn test_copy_all_idempotent() {
    let (_temp, input, output) = make_trees();
    let sync = TreeSynchronizer::new(&input, &output);

    let first = sync.copy_all().unwrap();
    assert_eq!(first.copied, 2);
    assert_eq!(fs::read_to_string(output.join("js/main.js")).unwrap(), "AAA");

    let second = sync.copy_all().unwrap();
    assert_eq!(second.copied, 0);
    assert_eq!(second.unchanged, 2);
}

#[test]
fn test_missing_input_is_setup_error() {
    let temp = TempDir::new().unwrap();
    let sync = TreeSynchronizer::new(&temp.path().join("nope"), &temp.path().join("out"));

    let err = sync.spawn().err().unwrap();
    assert!(err.is_setup());
    assert!(matches!(err, SyncError::MissingInput(_)));
}

#[test]
fn test_start_runs_initial_copy() {
    let (_temp, input, output) = make_trees();
    let watching = fast(&input, &output).start().unwrap();

    assert_eq!(watching.initial().copied, 2);
    assert_eq!(watching.watched(), 2);
    assert!(output.join("site.css").exists());
}

#[test]
fn test_converges_on_new_and_modified_file() {
    let (_temp, input, output) = make_trees();
    let handle = fast(&input, &output).spawn().unwrap();

    fs::write(input.join("js/extra.js"), "BBB").unwrap();
    assert!(wait_for(&output.join("js/extra.js"), "BBB"));

    fs::write(input.join("js/main.js"), "CCC").unwrap();
    assert!(wait_for(&output.join("js/main.js"), "CCC"));

    handle.stop();
}

#[test]
fn test_converges_on_new_nested_directory() {
    let (_temp, input, output) = make_trees();
    let handle = fast(&input, &output).spawn().unwrap();

    fs::create_dir_all(input.join("img/icons")).unwrap();
    fs::write(input.join("img/icons/logo.svg"), "<svg/>").unwrap();
    assert!(wait_for(&output.join("img/icons/logo.svg"), "<svg/>"));

    // The new directory is watched: later writes land too.
    std::thread::sleep(Duration::from_millis(100));
    fs::write(input.join("img/icons/logo.svg"), "<svg></svg>").unwrap();
    assert!(wait_for(&output.join("img/icons/logo.svg"), "<svg></svg>"));

    handle.stop();
}

#[test]
fn test_full_strategy_converges() {
    let (_temp, input, output) = make_trees();
    let handle = fast(&input, &output)
        .with_strategy(SyncStrategy::Full)
        .spawn()
        .unwrap();

    fs::write(input.join("site.css"), "b{}").unwrap();
    assert!(wait_for(&output.join("site.css"), "b{}"));

    handle.stop();
}

#[test]
fn test_failed_copy_is_retried_on_next_event() {
    let (_temp, input, output) = make_trees();
    // A directory where the file should land makes the rename fail.
    let blocker = output.join("js/extra.js");
    fs::create_dir_all(&blocker).unwrap();
    let handle = fast(&input, &output).spawn().unwrap();

    fs::write(input.join("js/extra.js"), "BBB").unwrap();
    std::thread::sleep(Duration::from_millis(300));
    assert!(blocker.is_dir());

    // The loop survived the failure and picks up the next change.
    fs::write(input.join("site.css"), "b{}").unwrap();
    assert!(wait_for(&output.join("site.css"), "b{}"));

    fs::remove_dir(&blocker).unwrap();
    fs::write(input.join("js/extra.js"), "CCC").unwrap();
    assert!(wait_for(&output.join("js/extra.js"), "CCC"));

    handle.stop();
}

#[test]
fn test_converges_on_renamed_file() {
    let (temp, input, output) = make_trees();
    let staged = temp.path().join("staged.js");
    fs::write(&staged, "MOVED").unwrap();
    let handle = fast(&input, &output).spawn().unwrap();

    fs::rename(&staged, input.join("js/moved.js")).unwrap();
    assert!(wait_for(&output.join("js/moved.js"), "MOVED"));

    fs::rename(input.join("js/moved.js"), input.join("js/renamed.js")).unwrap();
    assert!(wait_for(&output.join("js/renamed.js"), "MOVED"));

    handle.stop();
}

#[test]
fn test_converges_on_moved_in_directory() {
    let (temp, input, output) = make_trees();
    let staged = temp.path().join("staging/fonts");
    fs::create_dir_all(staged.join("woff")).unwrap();
    fs::write(staged.join("woff/body.woff"), "FONT").unwrap();
    fs::write(staged.join("fonts.css"), "@font-face{}").unwrap();
    let handle = fast(&input, &output).spawn().unwrap();

    fs::rename(&staged, input.join("fonts")).unwrap();
    assert!(wait_for(&output.join("fonts/woff/body.woff"), "FONT"));
    assert!(wait_for(&output.join("fonts/fonts.css"), "@font-face{}"));

    // The moved-in subtree is watched from now on.
    std::thread::sleep(Duration::from_millis(100));
    fs::write(input.join("fonts/woff/body.woff"), "FONT2").unwrap();
    assert!(wait_for(&output.join("fonts/woff/body.woff"), "FONT2"));

    handle.stop();
}

#[test]
fn test_deletions_are_not_mirrored() {
    let (_temp, input, output) = make_trees();
    let handle = fast(&input, &output).spawn().unwrap();

    fs::remove_file(input.join("site.css")).unwrap();
    fs::write(input.join("js/extra.js"), "BBB").unwrap();
    assert!(wait_for(&output.join("js/extra.js"), "BBB"));
    assert!(output.join("site.css").exists());

    handle.stop();
}

#[test]
fn test_stop_signal_ends_loop() {
    let (_temp, input, output) = make_trees();
    let (stop_tx, stop_rx) = crossbeam::channel::bounded(1);
    let sync = fast(&input, &output);

    let thread = std::thread::spawn(move || sync.watch(stop_rx));
    stop_tx.send(()).unwrap();
    assert!(thread.join().unwrap().is_ok());
}

#[test]
fn test_dropping_handle_stops_loop() {
    let (_temp, input, output) = make_trees();
    let handle = fast(&input, &output).spawn().unwrap();
    let signal = handle.stop_signal();
    drop(handle);
    // Receiver is gone once the loop has exited.
    assert!(signal.send(()).is_err());
}
