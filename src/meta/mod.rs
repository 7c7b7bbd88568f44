//! Metadata refresher: per-page `lastUpdated` sidecar files.
//!
//! Each tracked page has a JSON sidecar of the shape
//! `{"lastUpdated": "<ISO-8601>"}`, overwritten wholesale on each run.
//! Three timestamp strategies exist; exactly one runs per invocation:
//!
//! - `commit-log`: latest dated entry of an external commit log, applied
//!   to every tracked page uniformly
//! - `changed`: current time, applied only to pages touched in the most
//!   recent revision transition
//! - `mtime`: each source file's own modification time

mod changed;
mod commit_log;
mod mtime;
mod record;

pub use record::MetaRecord;

use crate::config::{SiteConfig, Strategy};
use crate::log;
use anyhow::Result;

/// Run the configured strategy over all tracked pages.
///
/// Per-page write failures are logged and skipped; only environmental
/// errors (not per-item ones) propagate.
pub fn refresh(config: &SiteConfig, strategy: Strategy) -> Result<()> {
    if config.meta.pages.is_empty() {
        log!("meta"; "no tracked pages configured, nothing to do");
        return Ok(());
    }

    match strategy {
        Strategy::CommitLog => commit_log::refresh(config),
        Strategy::Changed => changed::refresh(config),
        Strategy::Mtime => mtime::refresh(config),
    }
}
