//! Metadata sidecar record.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The single-field sidecar written next to each tracked page.
///
/// Serialized as `{"lastUpdated": "<ISO-8601>"}` with 2-space indentation,
/// matching what the site's frontend fetches at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

impl MetaRecord {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            last_updated: timestamp.into(),
        }
    }

    /// Overwrite `path` wholesale, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write `{}`", path.display()))
    }
}
