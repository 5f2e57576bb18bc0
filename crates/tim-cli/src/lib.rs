//! tim CLI library.
//!
//! This crate provides the command-line interface for the tim time log.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, EditAction, EventAction, LogAction, ProjectAction};
pub use config::Config;
