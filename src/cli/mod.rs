//! Command-line surface: flags, run configuration and command dispatch.

pub mod commands;
pub mod config;
pub mod flags;
