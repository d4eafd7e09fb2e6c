//! Source tree → output tree synchronization.
//!
//! Keeps the live asset directory mirroring a source directory while the
//! server runs. Follows the watcher-first pattern: watches are attached
//! before the initial copy, so nothing written during the copy is missed.
//!
//! ```text
//! idle ──start()──► initial copy ──► watching ──stop──► released
//!                                       │
//!                 notify → Debouncer → resync (targeted | full)
//! ```
//!
//! Deletions in the source tree are never mirrored.

mod copy;
mod debouncer;
mod error;
mod watch_set;

#[cfg(test)]
mod tests;

pub use copy::{CopyStats, copy_file, copy_tree, mirror_path};
pub use debouncer::DEBOUNCE_MS;
pub use error::SyncError;

use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use notify::RecommendedWatcher;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::section::SyncConfig;
use crate::logger::{status_error, status_success};
use crate::utils::path::normalize_path;
use debouncer::{ChangeKind, Debouncer};
use watch_set::WatchSet;

/// How a debounced batch of changes is applied to the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SyncStrategy {
    /// Copy only the changed files, or the subtree of a created directory
    #[default]
    Targeted,
    /// Re-run the full copy on every batch
    Full,
}

/// Mirrors `input` into `output`, then keeps it mirrored.
#[derive(Debug, Clone)]
pub struct TreeSynchronizer {
    input: PathBuf,
    output: PathBuf,
    strategy: SyncStrategy,
    debounce: Duration,
}

impl TreeSynchronizer {
    pub fn new(input: &Path, output: &Path) -> Self {
        Self {
            input: normalize_path(input),
            output: normalize_path(output),
            strategy: SyncStrategy::default(),
            debounce: Duration::from_millis(DEBOUNCE_MS),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.input, &config.output)
            .with_strategy(config.strategy)
            .with_debounce(config.debounce())
    }

    pub fn with_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Copy every regular file of the source tree into the output tree.
    ///
    /// Idempotent: a second run over an unchanged tree writes nothing.
    pub fn copy_all(&self) -> Result<CopyStats, SyncError> {
        self.check_input()?;
        copy_tree(&self.input, &self.output, &self.input)
    }

    /// Attach the watcher, then run the initial copy.
    ///
    /// Fails on anything that keeps the loop from starting: missing input,
    /// watcher creation, attaching watches, walking the tree. Individual
    /// copy failures during the initial pass are logged instead.
    pub fn start(self) -> Result<Watching, SyncError> {
        self.check_input()?;

        let (tx, events) = channel::unbounded::<notify::Result<notify::Event>>();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .map_err(SyncError::Watcher)?;

        let mut watch_set = WatchSet::new(self.input.clone());
        watch_set.attach_tree(&mut watcher, &self.input)?;
        crate::debug!("watch"; "watching {} directories under {}", watch_set.len(), self.input.display());

        let initial = match self.copy_all() {
            Ok(stats) => stats,
            Err(err @ (SyncError::Walk { .. } | SyncError::MissingInput(_))) => return Err(err),
            Err(err) => {
                report(&err);
                CopyStats::default()
            }
        };
        crate::log!("sync"; "{} → {}: {} copied, {} unchanged",
            self.input.display(), self.output.display(), initial.copied, initial.unchanged);

        let debouncer = Debouncer::new(self.debounce);
        Ok(Watching {
            sync: self,
            watcher,
            events,
            watch_set,
            debouncer,
            initial,
        })
    }

    /// Copy, then watch until `stop` fires or is disconnected.
    pub fn watch(self, stop: Receiver<()>) -> Result<(), SyncError> {
        self.start()?.run(&stop);
        Ok(())
    }

    /// Run [`TreeSynchronizer::watch`] on a background thread.
    ///
    /// Setup errors are returned here, before the thread starts.
    pub fn spawn(self) -> Result<SyncHandle, SyncError> {
        let watching = self.start()?;
        let (stop_tx, stop_rx) = channel::bounded(1);
        let thread = std::thread::spawn(move || watching.run(&stop_rx));
        Ok(SyncHandle {
            stop: stop_tx,
            thread: Some(thread),
        })
    }

    fn check_input(&self) -> Result<(), SyncError> {
        if self.input.is_dir() {
            Ok(())
        } else {
            Err(SyncError::MissingInput(self.input.clone()))
        }
    }
}

/// A synchronizer past its initial copy, with watches attached.
///
/// Events are buffering in the channel until [`Watching::run`] is called.
pub struct Watching {
    sync: TreeSynchronizer,
    watcher: RecommendedWatcher,
    events: Receiver<notify::Result<notify::Event>>,
    watch_set: WatchSet,
    debouncer: Debouncer,
    initial: CopyStats,
}

impl Watching {
    /// Result of the initial copy.
    pub fn initial(&self) -> CopyStats {
        self.initial
    }

    /// Number of directories currently watched.
    pub fn watched(&self) -> usize {
        self.watch_set.len()
    }

    /// Event loop. Returns when `stop` receives a message or its senders
    /// are dropped; the watcher is released on return.
    pub fn run(mut self, stop: &Receiver<()>) {
        loop {
            channel::select! {
                recv(stop) -> _ => break,
                recv(self.events) -> msg => match msg {
                    Ok(Ok(event)) => self.debouncer.add_event(&event),
                    Ok(Err(err)) => crate::log!("watch"; "notify error: {}", err),
                    Err(_) => break,
                },
                default(self.debouncer.sleep_duration()) => {}
            }

            if let Some(changes) = self.debouncer.take_if_ready() {
                self.apply(changes);
            }
        }
        crate::debug!("watch"; "stopped watching {}", self.sync.input.display());
    }

    fn apply(&mut self, changes: FxHashMap<PathBuf, ChangeKind>) {
        let mut paths: Vec<_> = changes.into_iter().collect();
        paths.sort_by(|a, b| a.0.cmp(&b.0));

        // New directories are attached first; files written into them
        // before the watch existed are picked up by the copy below.
        for (path, kind) in &paths {
            crate::debug!("watch"; "{}: {}", kind.label(), path.display());
            if path.is_dir() && mirror_path(&self.sync.input, &self.sync.output, path).is_some() {
                match self.watch_set.attach_tree(&mut self.watcher, path) {
                    Ok(0) => {}
                    Ok(n) => crate::debug!("watch"; "attached {} new directories", n),
                    Err(err) => report(&err),
                }
            }
        }

        let result = match self.sync.strategy {
            SyncStrategy::Full => self.sync.copy_all(),
            SyncStrategy::Targeted => self.copy_changed(&paths),
        };
        match result {
            Ok(stats) if stats.copied > 0 => {
                status_success(&format!("synced {} file(s)", stats.copied));
            }
            Ok(_) => {}
            Err(err) => report(&err),
        }
    }

    /// Stops at the first failing copy.
    fn copy_changed(&self, paths: &[(PathBuf, ChangeKind)]) -> Result<CopyStats, SyncError> {
        let (input, output) = (&self.sync.input, &self.sync.output);
        let mut stats = CopyStats::default();

        for (path, _) in paths {
            let Some(dest) = mirror_path(input, output, path) else {
                continue;
            };
            if path.is_dir() {
                stats += copy_tree(input, output, path)?;
            } else if path.is_file() {
                if copy_file(path, &dest)? {
                    stats.copied += 1;
                } else {
                    stats.unchanged += 1;
                }
            }
        }

        Ok(stats)
    }
}

/// Handle to a synchronizer running on its own thread.
///
/// Dropping the handle stops the loop and waits for it to exit.
pub struct SyncHandle {
    stop: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// A sender that stops the loop, for use from signal handlers.
    pub fn stop_signal(&self) -> Sender<()> {
        self.stop.clone()
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop.try_send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn report(err: &SyncError) {
    let detail = err.source().map(ToString::to_string).unwrap_or_default();
    status_error(&err.to_string(), &detail);
}
