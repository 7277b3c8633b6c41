//! Subcommands.

pub mod batch;
pub mod config;
pub mod input;
pub mod output;
pub mod process;
