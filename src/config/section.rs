//! Configuration section definitions for `sitekeeper.toml`.
//!
//! # Example
//!
//! ```toml
//! [meta]
//! strategy = "commit-log"
//! commit_log = "commits.json"
//! pages = [
//!     { source = "pages/home.html", meta = "meta/home_meta.json" },
//!     { source = "updates/sitelog.html", meta = "meta/sitelog_meta.json" },
//! ]
//!
//! [fonts]
//! dir = "font"
//!
//! [images]
//! dir = "art"
//! jpeg_quality = 82
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// [meta] section
// ============================================================================

/// Timestamp strategy for the metadata refresher.
///
/// Exactly one strategy runs per invocation; which one is a deployment
/// decision made in config (or overridden with `--strategy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Stamp every tracked page with the latest date from the commit log
    CommitLog,
    /// Stamp only pages changed in the last revision, with the current time
    Changed,
    /// Stamp each page with its own source file's mtime
    Mtime,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::CommitLog
    }
}

/// A tracked page and its metadata sidecar, both relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    /// Source page path (e.g. `pages/home.html`)
    pub source: PathBuf,
    /// Metadata output path (e.g. `meta/home_meta.json`)
    pub meta: PathBuf,
}

/// `[meta]` section: tracked pages and timestamp strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    pub strategy: Strategy,

    /// Externally maintained JSON array of commit records
    /// (commit-log strategy only)
    pub commit_log: PathBuf,

    /// Tracked page -> metadata file mapping
    pub pages: Vec<PageEntry>,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            commit_log: PathBuf::from("commits.json"),
            pages: Vec::new(),
        }
    }
}

// ============================================================================
// [fonts] section
// ============================================================================

/// `[fonts]` section: web-font generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Directory scanned (non-recursively) for `.ttf` sources
    pub dir: PathBuf,

    /// Explicit subsetter invocation, bypassing auto-detection.
    /// May carry arguments, e.g. `"python3 -m fontTools.subset"`
    pub subsetter: Option<String>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("font"),
            subsetter: None,
        }
    }
}

// ============================================================================
// [images] section
// ============================================================================

/// `[images]` section: raster recompression settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Directory scanned recursively for `.png`/`.jpg`/`.jpeg` files
    pub dir: PathBuf,

    /// JPEG re-encode quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("art"),
            jpeg_quality: 82,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_kebab_case() {
        let meta: MetaConfig = toml::from_str(r#"strategy = "commit-log""#).unwrap();
        assert_eq!(meta.strategy, Strategy::CommitLog);

        let meta: MetaConfig = toml::from_str(r#"strategy = "changed""#).unwrap();
        assert_eq!(meta.strategy, Strategy::Changed);

        let meta: MetaConfig = toml::from_str(r#"strategy = "mtime""#).unwrap();
        assert_eq!(meta.strategy, Strategy::Mtime);
    }

    #[test]
    fn test_meta_defaults() {
        let meta = MetaConfig::default();
        assert_eq!(meta.strategy, Strategy::CommitLog);
        assert_eq!(meta.commit_log, PathBuf::from("commits.json"));
        assert!(meta.pages.is_empty());
    }

    #[test]
    fn test_pages_inline_table() {
        let meta: MetaConfig = toml::from_str(
            r#"pages = [{ source = "pages/home.html", meta = "meta/home_meta.json" }]"#,
        )
        .unwrap();
        assert_eq!(meta.pages.len(), 1);
        assert_eq!(meta.pages[0].source, PathBuf::from("pages/home.html"));
        assert_eq!(meta.pages[0].meta, PathBuf::from("meta/home_meta.json"));
    }

    #[test]
    fn test_section_defaults() {
        let fonts = FontsConfig::default();
        assert_eq!(fonts.dir, PathBuf::from("font"));
        assert!(fonts.subsetter.is_none());

        let images = ImagesConfig::default();
        assert_eq!(images.dir, PathBuf::from("art"));
        assert_eq!(images.jpeg_quality, 82);
    }
}
