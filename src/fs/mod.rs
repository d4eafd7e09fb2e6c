//! Read-only asset filesystems.
//!
//! Two interchangeable views over the asset tree:
//!
//! - [`SnapshotFs`]: immutable in-memory files, frozen at startup or bundled
//!   into the binary. Used in production.
//! - [`LiveFs`]: a directory on disk, re-read on every access so the files
//!   mirrored by the synchronizer are visible to the next request.
//!
//! The variant is picked once from [`Mode`] by [`select`]; call sites only
//! see `dyn AssetFs`.

mod deny;
mod live;
mod snapshot;

pub use deny::{DEFAULT_DENIED, Denylist};
pub use live::LiveFs;
pub use snapshot::SnapshotFs;

use crate::error::AssetError;
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;

/// Environment variable that selects the filesystem mode.
pub const MODE_ENV: &str = "ASSETKIT_ENV";

/// Runtime mode that decides which filesystem backs the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Live directory, re-read on every access
    Development,
    /// Immutable snapshot
    #[default]
    Production,
}

impl Mode {
    /// Read the mode from `ASSETKIT_ENV`.
    ///
    /// `development` selects the live tree; anything else, including an
    /// unset variable, selects the snapshot.
    pub fn from_env() -> Self {
        std::env::var(MODE_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub const fn is_live(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("development") {
            Self::Development
        } else {
            Self::Production
        })
    }
}

/// Change detector for a single asset.
///
/// Snapshot files never change, so they all share [`ModSignal::Frozen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModSignal {
    Frozen,
    Stamp {
        modified: Option<SystemTime>,
        len: u64,
    },
}

/// Reader handed out by [`AssetFs::open`].
pub type AssetReader<'a> = Box<dyn Read + Send + 'a>;

/// A read-only view of the asset tree addressed by `/`-separated logical paths.
///
/// Implementations must report [`AssetError::NotFound`] for denylisted
/// extensions and for paths that escape the root.
pub trait AssetFs: Send + Sync {
    /// Open an asset for streaming.
    fn open(&self, path: &str) -> Result<AssetReader<'_>, AssetError>;

    /// Read an asset's full contents.
    fn read_all(&self, path: &str) -> Result<Cow<'_, [u8]>, AssetError>;

    /// Cheap change detector, used to revalidate cached fingerprints.
    fn signal(&self, path: &str) -> Result<ModSignal, AssetError>;

    /// The mode this filesystem implements.
    fn mode(&self) -> Mode;

    /// Whether the asset exists and may be served.
    fn exists(&self, path: &str) -> bool {
        self.signal(path).is_ok()
    }
}

/// Build the filesystem for `mode`.
///
/// Development reads `root` live; production freezes the current contents
/// of `root` into a snapshot.
pub fn select(mode: Mode, root: &Path, deny: Denylist) -> Result<Box<dyn AssetFs>, AssetError> {
    Ok(match mode {
        Mode::Development => Box::new(LiveFs::new(root, deny)),
        Mode::Production => Box::new(SnapshotFs::capture(root, deny)?),
    })
}
