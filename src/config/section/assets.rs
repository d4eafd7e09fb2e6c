//! `[assets]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! prefix = "public"       # URL prefix, also stripped from logical paths
//! root = "public"         # live directory (captured into a snapshot in production)
//! deny = ["go", "rs"]     # extensions that are never served
//! ```

use crate::fs::{DEFAULT_DENIED, Denylist};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Asset serving settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Public URL prefix the handler is mounted under.
    pub prefix: String,

    /// Directory the asset filesystem reads from.
    pub root: PathBuf,

    /// File extensions that are reported as missing.
    pub deny: Vec<String>,
}

impl AssetsConfig {
    pub fn denylist(&self) -> Denylist {
        Denylist::new(&self.deny)
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            prefix: "public".to_string(),
            root: PathBuf::from("public"),
            deny: DEFAULT_DENIED.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::path::PathBuf;

    #[test]
    fn test_assets_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.assets.prefix, "public");
        assert_eq!(config.assets.root, PathBuf::from("public"));
        assert!(config.assets.denylist().is_denied("main.go"));
    }

    #[test]
    fn test_assets_config_override() {
        let config = test_parse_config("[assets]\nprefix = \"/static/\"\ndeny = [\"tmpl\"]");
        assert_eq!(config.assets.prefix, "/static/");
        let deny = config.assets.denylist();
        assert!(deny.is_denied("page.tmpl"));
        assert!(!deny.is_denied("main.go"));
    }
}
