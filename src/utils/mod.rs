//! Utility modules shared by both maintenance commands.

pub mod date;
pub mod exec;
pub mod fs;
pub mod plural;
