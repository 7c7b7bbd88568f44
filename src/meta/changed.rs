//! Change-detection timestamp strategy.
//!
//! Stamps the current time onto pages whose source appears in the diff of
//! the most recent revision transition (`HEAD^` to `HEAD`). Pages outside
//! the changed set are left untouched that run. Meant for CI, where each
//! push triggers exactly one refresh.

use super::MetaRecord;
use crate::config::SiteConfig;
use crate::utils::date::DateTimeUtc;
use crate::utils::plural::plural_count;
use crate::{debug, exec, log};
use anyhow::Result;
use rustc_hash::FxHashSet;
use std::path::Path;

pub fn refresh(config: &SiteConfig) -> Result<()> {
    let changed = match changed_files(&config.root) {
        Ok(changed) => changed,
        Err(e) => {
            log!("meta"; "skipping: {e:#}");
            return Ok(());
        }
    };

    if changed.is_empty() {
        log!("meta"; "no files changed in the last revision");
        return Ok(());
    }

    let timestamp = DateTimeUtc::now().to_rfc3339();
    stamp(config, &changed, &timestamp);
    Ok(())
}

/// Write sidecars for every tracked page found in the changed set.
fn stamp(config: &SiteConfig, changed: &FxHashSet<String>, timestamp: &str) {
    let mut written = 0usize;
    for page in &config.meta.pages {
        let key = page.source.to_string_lossy();
        if !changed.contains(key.as_ref()) {
            debug!("meta"; "unchanged: {}", page.source.display());
            continue;
        }

        let target = config.root_join(&page.meta);
        match MetaRecord::new(timestamp).write(&target) {
            Ok(()) => {
                written += 1;
                log!("meta"; "✓ {}", page.meta.display());
            }
            Err(e) => log!("meta"; "✗ {}: {e:#}", page.meta.display()),
        }
    }

    log!("meta"; "stamped {} changed in the last revision", plural_count(written, "page"));
}

/// Repo-relative paths touched between `HEAD^` and `HEAD`.
fn changed_files(root: &Path) -> Result<FxHashSet<String>> {
    let output = exec!(root; "git"; "diff", "--name-only", "HEAD^", "HEAD")?;
    Ok(parse_changed(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_changed(stdout: &str) -> FxHashSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
