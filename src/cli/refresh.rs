//! `refresh` command: stamp metadata sidecars for tracked pages.

use crate::config::{SiteConfig, Strategy};
use crate::{debug, meta};
use anyhow::Result;

pub fn run(config: &SiteConfig, strategy: Option<Strategy>) -> Result<()> {
    let strategy = strategy.unwrap_or(config.meta.strategy);
    debug!("meta"; "strategy: {strategy:?}, {} tracked pages", config.meta.pages.len());
    meta::refresh(config, strategy)
}
