//! assetkit - content-addressed static assets.
//!
//! Every logical asset gets a URL derived from its bytes, so clients can
//! cache it forever while a change in content yields a new URL at once.
//!
//! - [`fingerprint`]: tokens, serving paths and the lookup cache
//! - [`fs`]: snapshot and live asset filesystems
//! - [`manager`]: path resolution and the HTTP handler
//! - [`sync`]: mirrors a source tree into the live tree during development

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod fs;
pub mod logger;
pub mod manager;
pub mod sync;
pub mod utils;

pub use error::AssetError;
pub use fs::{AssetFs, LiveFs, Mode, SnapshotFs};
pub use manager::{AssetManager, AssetResponse};
pub use sync::{SyncError, SyncHandle, SyncStrategy, TreeSynchronizer};
