//! Commit-log timestamp strategy.
//!
//! Reads an externally maintained JSON array of commit records and stamps
//! every tracked page with the latest dated entry. Unlike the other
//! strategies this one is all-or-nothing: if no usable timestamp can be
//! derived, nothing is written and the run reports a skip.

use super::MetaRecord;
use crate::config::SiteConfig;
use crate::log;
use crate::utils::date::DateTimeUtc;
use crate::utils::plural::plural_count;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One entry of the external commit log. Only `date` matters here;
/// whatever else the exporter writes is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRecord {
    #[serde(default)]
    pub date: Option<String>,
}

pub fn refresh(config: &SiteConfig) -> Result<()> {
    let log_path = config.root_join(&config.meta.commit_log);

    let commits = match load_commits(&log_path) {
        Ok(commits) => commits,
        Err(e) => {
            log!("meta"; "skipping: {e:#}");
            return Ok(());
        }
    };

    let Some(raw) = latest_timestamp(&commits) else {
        log!("meta"; "skipping: no dated entries in `{}`", log_path.display());
        return Ok(());
    };

    let Some(timestamp) = normalize(raw) else {
        log!("meta"; "skipping: unparsable commit date `{raw}`");
        return Ok(());
    };

    let mut written = 0usize;
    for page in &config.meta.pages {
        let target = config.root_join(&page.meta);
        match MetaRecord::new(&timestamp).write(&target) {
            Ok(()) => {
                written += 1;
                log!("meta"; "✓ {}", page.meta.display());
            }
            Err(e) => log!("meta"; "✗ {}: {e:#}", page.meta.display()),
        }
    }

    log!("meta"; "stamped {} with {timestamp}", plural_count(written, "page"));
    Ok(())
}

/// Latest dated entry, by string comparison (ISO-8601 sorts textually).
pub fn latest_timestamp(commits: &[CommitRecord]) -> Option<&str> {
    commits.iter().filter_map(|c| c.date.as_deref()).max()
}

/// Normalize a raw commit date to seconds-precision UTC with a `Z` suffix.
fn normalize(raw: &str) -> Option<String> {
    DateTimeUtc::parse(raw).map(DateTimeUtc::to_rfc3339)
}

fn load_commits(path: &Path) -> Result<Vec<CommitRecord>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("commit log `{}` not found", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("commit log `{}` is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageEntry;
    use tempfile::TempDir;

    fn dated(date: &str) -> CommitRecord {
        CommitRecord {
            date: Some(date.to_string()),
        }
    }

    fn test_config(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = root.to_path_buf();
        config.meta.pages = vec![
            PageEntry {
                source: "pages/home.html".into(),
                meta: "meta/home_meta.json".into(),
            },
            PageEntry {
                source: "updates/sitelog.html".into(),
                meta: "meta/sitelog_meta.json".into(),
            },
        ];
        config
    }

    #[test]
    fn test_latest_timestamp_max_by_date() {
        let commits = vec![dated("2024-01-01T00:00:00Z"), dated("2024-03-05T10:00:00Z")];
        assert_eq!(latest_timestamp(&commits), Some("2024-03-05T10:00:00Z"));
    }

    #[test]
    fn test_latest_timestamp_skips_undated() {
        let commits = vec![CommitRecord { date: None }, dated("2024-01-01")];
        assert_eq!(latest_timestamp(&commits), Some("2024-01-01"));

        let undated = vec![CommitRecord { date: None }];
        assert_eq!(latest_timestamp(&undated), None);
        assert_eq!(latest_timestamp(&[]), None);
    }

    #[test]
    fn test_normalize_pads_date_only() {
        assert_eq!(
            normalize("2024-03-05").as_deref(),
            Some("2024-03-05T00:00:00Z")
        );
        assert_eq!(
            normalize("2024-03-05T10:00:00Z").as_deref(),
            Some("2024-03-05T10:00:00Z")
        );
        assert_eq!(normalize("yesterday"), None);
    }

    #[test]
    fn test_refresh_stamps_all_pages() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());

        std::fs::write(
            dir.path().join("commits.json"),
            r#"[{"date": "2024-01-01T00:00:00Z"}, {"date": "2024-03-05T10:00:00Z"}]"#,
        )
        .unwrap();

        refresh(&config).unwrap();

        for name in ["home_meta.json", "sitelog_meta.json"] {
            let raw = std::fs::read_to_string(dir.path().join("meta").join(name)).unwrap();
            let record: MetaRecord = serde_json::from_str(&raw).unwrap();
            assert_eq!(record.last_updated, "2024-03-05T10:00:00Z");
        }
    }

    #[test]
    fn test_refresh_accepts_millisecond_dates() {
        // A JavaScript exporter writes Date.toISOString() output; the
        // sub-second part must be truncated, not treated as unparsable
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());

        std::fs::write(
            dir.path().join("commits.json"),
            r#"[{"date": "2024-03-05T10:00:00.000Z"}]"#,
        )
        .unwrap();

        refresh(&config).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("meta/home_meta.json")).unwrap();
        let record: MetaRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.last_updated, "2024-03-05T10:00:00Z");
    }

    #[test]
    fn test_normalize_shifts_offset_dates_to_utc() {
        assert_eq!(
            normalize("2024-03-05T12:00:00+02:00").as_deref(),
            Some("2024-03-05T10:00:00Z")
        );
    }

    #[test]
    fn test_refresh_missing_log_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());

        refresh(&config).unwrap();

        assert!(!dir.path().join("meta").exists());
    }

    #[test]
    fn test_refresh_unparsable_log_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());

        std::fs::write(dir.path().join("commits.json"), "this is not json").unwrap();
        refresh(&config).unwrap();

        assert!(!dir.path().join("meta").exists());
    }

    #[test]
    fn test_refresh_undated_log_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());

        std::fs::write(dir.path().join("commits.json"), r#"[{"hash": "abc"}]"#).unwrap();
        refresh(&config).unwrap();

        assert!(!dir.path().join("meta").exists());
    }
}
