//! Day-by-day aggregation of category entries into report rows.

use std::collections::HashMap;

use ansi_term::Style;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::category::Category;
use crate::day::{build_day_entries, full_day};
use crate::entry::CategoryEntry;
use crate::fetch::{TaskFetcher, TaskMetadata};
use crate::interval::TrackedInterval;

/// What a rendered row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// One (category, tag-group) pair.
    Entry,
    /// Marker row carrying a day's total.
    DayTotal,
    /// Blank underlined row before the grand total.
    Separator,
    /// Final row carrying the grand total.
    GrandTotal,
}

/// One row of the report table. Cells are already-rendered text; empty cells
/// stay empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub week: String,
    pub date: String,
    pub day: String,
    pub category: String,
    pub tags: String,
    pub link: String,
    pub ids: String,
    pub time: String,
    pub total: String,
}

impl Row {
    fn blank(kind: RowKind) -> Self {
        Self {
            kind,
            week: String::new(),
            date: String::new(),
            day: String::new(),
            category: String::new(),
            tags: String::new(),
            link: String::new(),
            ids: String::new(),
            time: String::new(),
            total: String::new(),
        }
    }
}

/// Settings for one report invocation.
///
/// `id_style` only affects how interval identifiers are painted; it never
/// changes a computed value. `fetcher` optionally resolves task titles; when
/// absent, task entries render from their identifier alone.
pub struct ReportOptions<'a> {
    pub now: DateTime<Utc>,
    pub id_style: Option<Style>,
    pub fetcher: Option<&'a dyn TaskFetcher>,
}

impl ReportOptions<'_> {
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            id_style: None,
            fetcher: None,
        }
    }
}

/// Formats a duration as `H:MM:SS` with unbounded hours.
pub fn format_hours(duration: Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Builds the full report for `[start, end)`.
///
/// An unbounded start falls back to the earliest tracked interval's start,
/// an unbounded end to `now`. Days are walked one at a time; days without
/// entries emit nothing. After the last day come the underlined separator
/// and the grand total. An empty interval collection yields no rows at all.
pub fn build_report(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    tracked: &[TrackedInterval],
    opts: &ReportOptions<'_>,
) -> Vec<Row> {
    if tracked.is_empty() {
        return Vec::new();
    }

    let start = start.unwrap_or_else(|| {
        tracked
            .iter()
            .map(TrackedInterval::start)
            .min()
            .expect("collection is non-empty")
    });
    let end = end.unwrap_or(opts.now);

    let mut rows = Vec::new();
    let mut grand_total = Duration::zero();
    let mut previous: Option<NaiveDate> = None;
    let mut metadata_cache: HashMap<String, Option<TaskMetadata>> = HashMap::new();

    let mut day = start.date_naive();
    while full_day(day).0 < end {
        let mut entries = build_day_entries(day, tracked, opts.now);
        if entries.is_empty() {
            day = day.succ_opt().expect("date range stays within chrono bounds");
            continue;
        }

        entries.sort_by(|a, b| a.category().cmp(b.category()));
        resolve_metadata(&mut entries, opts.fetcher, &mut metadata_cache);

        let day_total = emit_day(&mut rows, day, &entries, &mut previous, opts);
        grand_total += day_total;

        day = day.succ_opt().expect("date range stays within chrono bounds");
    }

    rows.push(Row::blank(RowKind::Separator));

    let mut total_row = Row::blank(RowKind::GrandTotal);
    total_row.total = format_hours(grand_total);
    rows.push(total_row);

    rows
}

/// Emits one non-empty day's rows and returns the day total.
fn emit_day(
    rows: &mut Vec<Row>,
    day: NaiveDate,
    entries: &[CategoryEntry],
    previous: &mut Option<NaiveDate>,
    opts: &ReportOptions<'_>,
) -> Duration {
    let mut day_total = Duration::zero();
    let mut first_row_of_day = *previous != Some(day);

    for entry in entries {
        let mut first_group = true;
        for (label, intervals) in entry.groups() {
            let group_total = intervals.iter().fold(Duration::zero(), |total, interval| {
                total + interval.duration(opts.now)
            });
            day_total += group_total;

            let mut row = Row::blank(RowKind::Entry);
            if first_row_of_day {
                row.week = format!("W{}", day.iso_week().week());
                row.date = day.format("%Y-%m-%d").to_string();
                row.day = day.format("%a").to_string();
                first_row_of_day = false;
            }
            if first_group {
                row.category = entry.pretty_label();
                row.link = entry.uri();
                first_group = false;
            }
            row.tags = label.to_string();
            row.ids = render_ids(intervals, opts.id_style);
            row.time = format_hours(group_total);
            rows.push(row);
        }
    }

    *previous = Some(day);

    let mut marker = Row::blank(RowKind::DayTotal);
    marker.total = format_hours(day_total);
    rows.push(marker);

    day_total
}

/// Attaches fetched metadata to task entries, fetching each task id at most
/// once per report. Failures are logged and leave the entry bare.
fn resolve_metadata(
    entries: &mut [CategoryEntry],
    fetcher: Option<&dyn TaskFetcher>,
    cache: &mut HashMap<String, Option<TaskMetadata>>,
) {
    let Some(fetcher) = fetcher else {
        return;
    };

    for entry in entries {
        let Category::Task(task) = entry.category() else {
            continue;
        };

        let cached = cache.entry(task.id().to_string()).or_insert_with(|| {
            match fetcher.fetch(task) {
                Ok(metadata) => Some(metadata),
                Err(err) => {
                    tracing::warn!(task = task.id(), error = %err, "task metadata fetch failed");
                    None
                }
            }
        });

        if let Some(metadata) = cached {
            entry.set_metadata(metadata.clone());
        }
    }
}

fn render_ids(intervals: &[TrackedInterval], style: Option<Style>) -> String {
    intervals
        .iter()
        .map(|interval| {
            let id = format!("@{}", interval.id());
            match style {
                Some(style) => style.paint(id).to_string(),
                None => id,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
