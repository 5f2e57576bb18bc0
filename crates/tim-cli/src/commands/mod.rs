//! CLI subcommand implementations.
//!
//! Each command loads the stores it needs at start, mutates them in memory
//! and writes them back whole before returning.

pub mod event;
pub mod log;
pub mod project;
