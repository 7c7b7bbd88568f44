//! Command-line interface module.

mod args;
pub mod optimize;
pub mod refresh;

pub use args::{Cli, Commands};
