//! Site configuration management for `sitekeeper.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `[meta]`   | Tracked pages, timestamp strategy, commit log    |
//! | `[fonts]`  | Font directory and subsetter override            |
//! | `[images]` | Image directory and JPEG quality                 |

mod error;
mod section;

pub use error::ConfigError;
pub use section::{FontsConfig, ImagesConfig, MetaConfig, PageEntry, Strategy};

use crate::cli::Cli;
use crate::log;
use crate::utils::fs::normalize_path;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing sitekeeper.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Metadata refresher settings
    #[serde(default)]
    pub meta: MetaConfig,

    /// Font optimizer settings
    #[serde(default)]
    pub fonts: FontsConfig,

    /// Image optimizer settings
    #[serde(default)]
    pub images: ImagesConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            log!(
                "error";
                "Config file '{}' not found in this directory or any parent.",
                cli.config.display()
            );
            std::process::exit(1);
        };

        let mut config = Self::from_path(&config_path)?;

        config.root = config_path
            .parent()
            .map(normalize_path)
            .unwrap_or_default();
        config.config_path = config_path;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        for field in &ignored {
            log!("warning"; "unknown config field `{field}` (ignored)");
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Parse TOML, collecting field paths serde did not recognize.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let de = toml::Deserializer::new(content);
        let mut ignored = Vec::new();
        let config = serde_ignored::deserialize(de, |path| ignored.push(path.to_string()))?;
        Ok((config, ignored))
    }

    /// Validate loaded values.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.jpeg_quality) {
            return Err(ConfigError::Validation(format!(
                "images.jpeg_quality must be 1-100, got {}",
                self.images.jpeg_quality
            )));
        }

        // Two pages writing the same sidecar would silently clobber each other
        for (i, page) in self.meta.pages.iter().enumerate() {
            if let Some(other) = self.meta.pages[..i].iter().find(|p| p.meta == page.meta) {
                return Err(ConfigError::Validation(format!(
                    "meta.pages: '{}' and '{}' both output to '{}'",
                    other.source.display(),
                    page.source.display(),
                    page.meta.display()
                )));
            }
        }

        Ok(())
    }

    /// Resolve a config-relative path against the project root.
    pub fn root_join(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    // First check if config_name is an absolute path or exists in cwd
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    // Walk up from cwd looking for config file
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = SiteConfig::from_str(
            r#"
            [meta]
            strategy = "mtime"
            commit_log = "data/commits.json"
            pages = [
                { source = "pages/home.html", meta = "meta/home_meta.json" },
                { source = "updates/sitelog.html", meta = "meta/sitelog_meta.json" },
            ]

            [fonts]
            dir = "assets/font"

            [images]
            dir = "assets/art"
            jpeg_quality = 70
            "#,
        )
        .unwrap();

        assert_eq!(config.meta.strategy, Strategy::Mtime);
        assert_eq!(config.meta.commit_log, PathBuf::from("data/commits.json"));
        assert_eq!(config.meta.pages.len(), 2);
        assert_eq!(config.fonts.dir, PathBuf::from("assets/font"));
        assert_eq!(config.images.jpeg_quality, 70);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = SiteConfig::from_str("").unwrap();
        assert_eq!(config.meta.strategy, Strategy::CommitLog);
        assert_eq!(config.fonts.dir, PathBuf::from("font"));
        assert_eq!(config.images.dir, PathBuf::from("art"));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) = SiteConfig::parse_with_ignored(
            r#"
            [meta]
            strateggy = "mtime"
            "#,
        )
        .unwrap();
        assert_eq!(ignored, vec!["meta.strateggy".to_string()]);
    }

    #[test]
    fn test_validate_jpeg_quality() {
        let mut config = SiteConfig::from_str("").unwrap();
        config.images.jpeg_quality = 0;
        assert!(config.validate().is_err());

        config.images.jpeg_quality = 101;
        assert!(config.validate().is_err());

        config.images.jpeg_quality = 82;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_meta_output() {
        let config = SiteConfig::from_str(
            r#"
            [meta]
            pages = [
                { source = "a.html", meta = "meta/a.json" },
                { source = "b.html", meta = "meta/a.json" },
            ]
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_root_join() {
        let mut config = SiteConfig::default();
        config.root = PathBuf::from("/site");
        assert_eq!(
            config.root_join(Path::new("meta/home_meta.json")),
            PathBuf::from("/site/meta/home_meta.json")
        );
        assert_eq!(
            config.root_join(Path::new("/abs/path.json")),
            PathBuf::from("/abs/path.json")
        );
    }
}
