//! `assetkit sync`: copy once, or keep the output tree mirrored.

use super::shutdown;
use anyhow::{Context, Result};
use assetkit::config::AssetkitConfig;
use assetkit::log;
use assetkit::sync::{SyncStrategy, TreeSynchronizer};

pub fn run_sync(config: &AssetkitConfig, watch: bool, strategy: Option<SyncStrategy>) -> Result<()> {
    let mut sync = TreeSynchronizer::from_config(&config.sync);
    if let Some(strategy) = strategy {
        sync = sync.with_strategy(strategy);
    }

    if !watch {
        let stats = sync
            .copy_all()
            .with_context(|| format!("failed to sync {}", sync.input().display()))?;
        log!("sync"; "{} → {}: {} copied, {} unchanged",
            sync.input().display(), sync.output().display(), stats.copied, stats.unchanged);
        return Ok(());
    }

    let (stop_tx, stop_rx) = crossbeam::channel::bounded(1);
    shutdown::register_stop(stop_tx);

    let input = sync.input().to_path_buf();
    sync.watch(stop_rx)
        .with_context(|| format!("failed to watch {}", input.display()))?;
    log!("watch"; "stopped");
    Ok(())
}
