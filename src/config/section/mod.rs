//! Configuration sections of `assetkit.toml`.

mod assets;
mod serve;
mod sync;

pub use assets::AssetsConfig;
pub use serve::ServeConfig;
pub use sync::SyncConfig;
