//! Timesheet CLI library.
//!
//! This crate provides the CLI interface for the timesheet tool.

mod cli;
pub mod commands;
mod config;
pub mod render;

pub use cli::{Cli, ColorMode, Commands, ReportArgs};
pub use config::Config;
