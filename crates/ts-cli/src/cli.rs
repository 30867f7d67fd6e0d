//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Timesheet reporter for tracked intervals.
///
/// Reads a Timewarrior-style interval export and renders a per-day,
/// per-category table with day and grand totals.
#[derive(Debug, Parser)]
#[command(name = "timesheet", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the timesheet table for a date range.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Start of the range. ISO 8601, a date, or e.g. "2 days ago".
    /// Defaults to the earliest tracked interval.
    #[arg(long)]
    pub start: Option<String>,

    /// End of the range, exclusive. Same forms as --start; defaults to now.
    #[arg(long)]
    pub end: Option<String>,

    /// Read the interval export from this file instead of stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// When to highlight interval identifiers.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Resolve task titles and project tags from the tracker.
    #[arg(long)]
    pub fetch_titles: bool,
}

/// Identifier highlighting behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Follow the configuration, but only on a terminal.
    Auto,
    Always,
    Never,
}
