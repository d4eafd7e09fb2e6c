//! Configuration management for `assetkit.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                           |
//! |------------|---------------------------------------------------|
//! | `[assets]` | URL prefix, asset root, extension denylist        |
//! | `[sync]`   | Source/output trees mirrored in development       |
//! | `[serve]`  | Standalone asset server (interface, port, watch)  |
//!
//! Every section is optional; a missing file means all defaults rooted at
//! the current directory.

pub mod section;
pub mod types;
mod util;

pub use section::{AssetsConfig, ServeConfig, SyncConfig};
pub use types::ConfigError;
pub use util::find_config_file;

use crate::fingerprint::normalize_prefix;
use crate::log;
use crate::utils::path::normalize_path;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::root_relative;

/// Default config file name.
pub const CONFIG_FILE: &str = "assetkit.toml";

/// Root configuration structure representing assetkit.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetkitConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl AssetkitConfig {
    /// Locate and load the config file, falling back to defaults.
    ///
    /// Searches upward from the current directory for `name`. The project
    /// root is the config file's parent, or the current directory when no
    /// file exists.
    pub fn discover(name: &Path) -> Result<Self, ConfigError> {
        match find_config_file(name) {
            Some(path) => Self::from_path(&path),
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|err| ConfigError::Io(PathBuf::from("."), err))?;
                let mut config = Self::default();
                config.finalize(&cwd);
                Ok(config)
            }
        }
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.finalize(&root);
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Anchor relative paths at `root`.
    pub fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.assets.root = root_relative(root, &self.assets.root);
        self.sync.input = root_relative(root, &self.sync.input);
        self.sync.output = root_relative(root, &self.sync.output);
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if normalize_prefix(&self.assets.prefix).is_empty() {
            return Err(ConfigError::Validation(
                "[assets] prefix must name at least one path segment".into(),
            ));
        }
        if self.assets.prefix.contains(['?', '#', '*', '\\']) {
            return Err(ConfigError::Validation(format!(
                "[assets] prefix `{}` contains characters not allowed in a URL path",
                self.assets.prefix
            )));
        }
        let input = normalize_path(&self.sync.input);
        let output = normalize_path(&self.sync.output);
        if input == output {
            return Err(ConfigError::Validation(
                "[sync] input and output must be different directories".into(),
            ));
        }
        if output.starts_with(&input) {
            return Err(ConfigError::Validation(format!(
                "[sync] output `{}` is inside input `{}`; copies would trigger more copies",
                self.sync.output.display(),
                self.sync.input.display()
            )));
        }
        Ok(())
    }
}

/// Parse a config snippet for tests, rejecting unknown fields.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> AssetkitConfig {
    let (parsed, ignored) = AssetkitConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) =
            AssetkitConfig::parse_with_ignored("[assets]\nprefx = \"static\"").unwrap();
        assert_eq!(ignored, vec!["assets.prefx".to_string()]);
    }

    #[test]
    fn test_from_path_anchors_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[sync]\ninput = \"web/src\"\noutput = \"/var/www/assets\"").unwrap();

        let config = AssetkitConfig::from_path(&path).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.sync.input, dir.path().join("web/src"));
        assert_eq!(config.sync.output, PathBuf::from("/var/www/assets"));
        assert_eq!(config.assets.root, dir.path().join("public"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = AssetkitConfig::parse_with_ignored("[assets\nprefix = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_validate_defaults() {
        let mut config = AssetkitConfig::default();
        config.finalize(Path::new("/srv/app"));
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut config = test_parse_config("[assets]\nprefix = \"/\"");
        config.finalize(Path::new("/srv/app"));
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_nested_output() {
        let mut config = test_parse_config("[sync]\ninput = \"assets\"\noutput = \"assets/dist\"");
        config.finalize(Path::new("/srv/app"));
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_disguised_nested_output() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        let name = dir.path().file_name().unwrap().to_str().unwrap();
        let climbing = format!("../{name}/assets/dist");

        for output in ["assets/./dist", climbing.as_str(), "assets/js/../dist"] {
            let mut config = test_parse_config(&format!(
                "[sync]\ninput = \"assets\"\noutput = \"{output}\""
            ));
            config.finalize(dir.path());
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "{output} accepted"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_rejects_symlinked_output() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("assets"), dir.path().join("link")).unwrap();

        let mut config = test_parse_config("[sync]\ninput = \"assets\"\noutput = \"link/dist\"");
        config.finalize(dir.path());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}
