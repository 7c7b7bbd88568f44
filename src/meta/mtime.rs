//! File-mtime timestamp strategy.
//!
//! Each tracked page's sidecar reflects its own source file's last
//! modification time, converted to UTC ISO-8601. Pages are independent:
//! a missing source is reported and the run continues.

use super::MetaRecord;
use crate::config::SiteConfig;
use crate::log;
use crate::utils::date::DateTimeUtc;
use crate::utils::fs::get_mtime;
use crate::utils::plural::plural_count;
use anyhow::Result;
use std::path::Path;
use std::time::UNIX_EPOCH;

pub fn refresh(config: &SiteConfig) -> Result<()> {
    let mut written = 0usize;
    for page in &config.meta.pages {
        let source = config.root_join(&page.source);
        let Some(timestamp) = source_timestamp(&source) else {
            log!("meta"; "✗ {}: source not found", page.source.display());
            continue;
        };

        let target = config.root_join(&page.meta);
        match MetaRecord::new(&timestamp).write(&target) {
            Ok(()) => {
                written += 1;
                log!("meta"; "✓ {} ({timestamp})", page.meta.display());
            }
            Err(e) => log!("meta"; "✗ {}: {e:#}", page.meta.display()),
        }
    }

    log!("meta"; "stamped {} from source mtimes", plural_count(written, "page"));
    Ok(())
}

/// Source file mtime as UTC ISO-8601, or `None` if unreadable.
fn source_timestamp(source: &Path) -> Option<String> {
    let mtime = get_mtime(source)?;
    let secs = mtime.duration_since(UNIX_EPOCH).ok()?.as_secs();
    Some(DateTimeUtc::from_unix(secs).to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageEntry;
    use tempfile::TempDir;

    #[test]
    fn test_refresh_writes_mtime_per_page() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("pages")).unwrap();
        std::fs::write(dir.path().join("pages/home.html"), "<html></html>").unwrap();

        let mut config = SiteConfig::default();
        config.root = dir.path().to_path_buf();
        config.meta.pages = vec![
            PageEntry {
                source: "pages/home.html".into(),
                meta: "meta/home_meta.json".into(),
            },
            // Missing source: reported, run continues
            PageEntry {
                source: "pages/ghost.html".into(),
                meta: "meta/ghost_meta.json".into(),
            },
        ];

        refresh(&config).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("meta/home_meta.json")).unwrap();
        let record: MetaRecord = serde_json::from_str(&raw).unwrap();
        assert!(DateTimeUtc::parse(&record.last_updated).is_some());

        assert!(!dir.path().join("meta/ghost_meta.json").exists());
    }

    #[test]
    fn test_source_timestamp_missing() {
        assert!(source_timestamp(Path::new("/nonexistent/page.html")).is_none());
    }
}
