//! `optimize` command: shrink font and image assets in place.

use crate::asset;
use crate::config::SiteConfig;
use anyhow::Result;

pub fn run(config: &SiteConfig, fonts: Option<bool>, images: Option<bool>) -> Result<()> {
    if fonts.unwrap_or(true) {
        asset::optimize_fonts(config)?;
    }
    if images.unwrap_or(true) {
        asset::optimize_images(config)?;
    }
    Ok(())
}
