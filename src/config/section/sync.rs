//! `[sync]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sync]
//! input = "assets"        # source tree
//! output = "public"       # mirrored build output
//! debounce_ms = 100       # quiet period before copying a burst of changes
//! strategy = "targeted"   # "targeted" copies changed paths, "full" recopies the tree
//! ```

use crate::sync::SyncStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tree synchronizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub debounce_ms: u64,
    pub strategy: SyncStrategy,
}

impl SyncConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("assets"),
            output: PathBuf::from("public"),
            debounce_ms: 100,
            strategy: SyncStrategy::default(),
        }
    }
}
