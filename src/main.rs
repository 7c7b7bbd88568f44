//! Sitekeeper - maintenance toolkit for a static website.
//!
//! Two independent utilities behind one CLI:
//! - `refresh`: stamp `lastUpdated` metadata sidecars for tracked pages
//! - `optimize`: shrink font and image assets in place

mod asset;
mod cli;
mod config;
mod logger;
mod meta;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Refresh { strategy } => cli::refresh::run(&config, *strategy),
        Commands::Optimize { fonts, images } => cli::optimize::run(&config, *fonts, *images),
    }
}
