//! Command-line interface definitions.

use crate::config::Strategy;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Sitekeeper static website maintenance CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitekeeper.toml)
    #[arg(short = 'C', long, default_value = "sitekeeper.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Refresh lastUpdated metadata for tracked pages
    #[command(visible_alias = "r")]
    Refresh {
        /// Timestamp strategy (overrides the config file)
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,
    },

    /// Optimize font and image assets in place
    #[command(visible_alias = "o")]
    Optimize {
        /// Process fonts (default: true)
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        fonts: Option<bool>,

        /// Process images (default: true)
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        images: Option<bool>,
    },
}
