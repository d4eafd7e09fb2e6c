//! `assetkit path`: print what a template's `pathFor` would return.

use anyhow::{Context, Result, bail};
use assetkit::config::AssetkitConfig;
use assetkit::fs::Mode;
use assetkit::manager::AssetManager;
use assetkit::log;

pub fn print_paths(config: &AssetkitConfig, mode: Mode, paths: &[String]) -> Result<()> {
    let manager = AssetManager::from_config(&config.assets, mode)
        .with_context(|| format!("failed to load assets from {}", config.assets.root.display()))?;

    let mut missing = 0;
    for logical in paths {
        match manager.path_for(logical) {
            Ok(serving) => println!("{serving}"),
            Err(err) => {
                log!("error"; "{}", err);
                missing += 1;
            }
        }
    }

    if missing > 0 {
        bail!("{} of {} asset(s) could not be resolved", missing, paths.len());
    }
    Ok(())
}
