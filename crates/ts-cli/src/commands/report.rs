//! Report command: load intervals, build the report, render the table.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use ts_core::{
    FetchError, ReportOptions, TaskFetcher, TaskMetadata, TaskRef, TrackedInterval, Tracker,
    build_report,
};

use super::util::parse_datetime;
use crate::cli::{ColorMode, ReportArgs};
use crate::config::Config;
use crate::render::render_table;

/// Runs the report command, writing the rendered table to `writer`.
pub fn run<W: Write>(writer: &mut W, args: &ReportArgs, config: &Config) -> Result<()> {
    let tracked = load_intervals(args.input.as_deref())?;
    tracing::debug!(count = tracked.len(), "loaded tracked intervals");

    let start = args.start.as_deref().map(parse_datetime).transpose()?;
    let end = args.end.as_deref().map(parse_datetime).transpose()?;

    let color = match args.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => config.color && io::stdout().is_terminal(),
    };

    let fetcher = if args.fetch_titles || config.fetch_titles {
        Some(ConduitFetcher::new(config)?)
    } else {
        None
    };

    let opts = ReportOptions {
        now: Utc::now(),
        id_style: color.then(|| config.id_style()),
        fetcher: fetcher.as_ref().map(|f| f as &dyn TaskFetcher),
    };

    let rows = build_report(start, end, &tracked, &opts);
    if rows.is_empty() {
        tracing::info!("no tracked intervals in range");
        return Ok(());
    }

    write!(writer, "{}", render_table(&rows, color))?;
    Ok(())
}

/// Reads the interval export from a file, or stdin when no path is given.
fn load_intervals(input: Option<&Path>) -> Result<Vec<TrackedInterval>> {
    let raw = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read export from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("failed to parse interval export")
}

/// Synchronous adapter over the async Conduit clients, one per tracker.
struct ConduitFetcher {
    runtime: tokio::runtime::Runtime,
    collabora: ts_phab::Client,
    apertis: ts_phab::Client,
}

impl ConduitFetcher {
    fn new(config: &Config) -> Result<Self> {
        let api_token = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("missing Conduit API token (set TIMESHEET_API_TOKEN or config.toml)")
            })?;

        Ok(Self {
            runtime: tokio::runtime::Runtime::new()
                .context("failed to initialize tokio runtime")?,
            collabora: ts_phab::Client::new(&config.collabora_url, api_token)
                .context("failed to create Conduit client")?,
            apertis: ts_phab::Client::new(&config.apertis_url, api_token)
                .context("failed to create Conduit client")?,
        })
    }
}

impl TaskFetcher for ConduitFetcher {
    fn fetch(&self, task: &TaskRef) -> Result<TaskMetadata, FetchError> {
        let client = match task.system() {
            Tracker::Collabora => &self.collabora,
            Tracker::Apertis => &self.apertis,
        };

        let info = self
            .runtime
            .block_on(client.task_info(task.number()))
            .map_err(|err| match err {
                ts_phab::ConduitError::NotFound { .. } => FetchError::NotFound {
                    id: task.id().to_string(),
                },
                other => FetchError::Backend {
                    message: other.to_string(),
                },
            })?;

        Ok(TaskMetadata {
            title: info.title,
            tags: info.projects,
        })
    }
}
