//! Subcommand implementations

pub mod config;
pub mod locate;
pub mod replay;
pub mod suggest;
