//! Per-day scan of tracked intervals into category entries.

use chrono::{DateTime, NaiveDate, Utc};

use crate::category::Category;
use crate::entry::CategoryEntry;
use crate::interval::TrackedInterval;

/// Full-day range `[start-of-day, start-of-next-day)` in UTC.
pub fn full_day(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc();
    let next = day
        .succ_opt()
        .expect("date range stays within chrono bounds")
        .and_hms_opt(0, 0, 0)
        .expect("midnight exists")
        .and_utc();
    (start, next)
}

/// Builds the category entries for one calendar day.
///
/// Scans every tracked interval intersecting the day, classifies each of its
/// tags, and attaches the interval to the matching entry, creating entries
/// lazily. At most one entry exists per category key; an interval joins a
/// given entry once even when several of its tags map to the same category,
/// but an interval tagged for two distinct categories joins both.
///
/// Open intervals are skipped on days after `now`'s day, and zero-length
/// intervals are skipped everywhere. Entries come back in first-encounter
/// order, possibly empty.
pub fn build_day_entries(
    day: NaiveDate,
    tracked: &[TrackedInterval],
    now: DateTime<Utc>,
) -> Vec<CategoryEntry> {
    let (day_start, day_end) = full_day(day);
    let today = now.date_naive();
    let mut entries: Vec<CategoryEntry> = Vec::new();

    for track in tracked {
        if !track.overlaps(day_start, day_end) {
            continue;
        }
        // An open interval reaches indefinitely forward; it belongs to days
        // up to and including today, never to later ones.
        if track.is_open() && day > today {
            continue;
        }
        if track.is_empty() {
            continue;
        }

        let mut claimed: Vec<usize> = Vec::new();
        for tag in track.tags() {
            let Some(category) = Category::classify(tag) else {
                continue;
            };

            let position = entries.iter().position(|entry| entry.key() == category.key());
            let position = position.unwrap_or_else(|| {
                entries.push(CategoryEntry::new(category));
                entries.len() - 1
            });

            if !claimed.contains(&position) {
                entries[position].add_interval(track);
                claimed.push(position);
            }
        }
    }

    entries
}
