//! Category entries: one category instance for one report day.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::category::Category;
use crate::fetch::TaskMetadata;
use crate::interval::TrackedInterval;

/// One category instance for one report day.
///
/// Intervals attach grouped by their tag-group label: the interval's tags in
/// original order, minus every tag the category predicate claims, each with
/// its first letter upper-cased, joined with `", "`. The empty label is a
/// legitimate group for intervals carrying no extra tags. Labels iterate in
/// lexicographic order when rows are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    category: Category,
    metadata: Option<TaskMetadata>,
    groups: BTreeMap<String, Vec<TrackedInterval>>,
}

impl CategoryEntry {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            metadata: None,
            groups: BTreeMap::new(),
        }
    }

    pub const fn category(&self) -> &Category {
        &self.category
    }

    /// The category key this entry is de-duplicated by.
    pub fn key(&self) -> &str {
        self.category.key()
    }

    /// Appends the interval to the group named by its tag-group label.
    ///
    /// Appending is order-preserving and never de-duplicates; callers must
    /// not attach the same interval to one entry twice.
    pub fn add_interval(&mut self, interval: &TrackedInterval) {
        let label = self.group_label(interval.tags());
        self.groups.entry(label).or_default().push(interval.clone());
    }

    /// Tag groups in label order, each with its intervals in attach order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[TrackedInterval])> {
        self.groups
            .iter()
            .map(|(label, intervals)| (label.as_str(), intervals.as_slice()))
    }

    /// Sum of all attached intervals' durations.
    pub fn total(&self, now: DateTime<Utc>) -> Duration {
        self.groups
            .values()
            .flatten()
            .fold(Duration::zero(), |total, interval| {
                total + interval.duration(now)
            })
    }

    pub fn set_metadata(&mut self, metadata: TaskMetadata) {
        self.metadata = Some(metadata);
    }

    pub const fn metadata(&self) -> Option<&TaskMetadata> {
        self.metadata.as_ref()
    }

    /// Display label for the category column. A task entry with a fetched
    /// title renders as `T123 (Title)`; otherwise the identifier alone.
    pub fn pretty_label(&self) -> String {
        let base = self.category.pretty_id();
        match &self.metadata {
            Some(metadata) if !metadata.title.is_empty() => {
                format!("{base} ({})", metadata.title)
            }
            _ => base,
        }
    }

    pub fn uri(&self) -> String {
        self.category.uri()
    }

    fn group_label(&self, tags: &[String]) -> String {
        let mut label = String::new();
        for tag in tags {
            let tag = tag.to_lowercase();
            if self.category.is_category_tag(&tag) {
                continue;
            }
            if !label.is_empty() {
                label.push_str(", ");
            }
            label.push_str(&upper_case_first(&tag));
        }
        label
    }
}

fn upper_case_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, h, m, 0).unwrap()
    }

    fn interval(id: u32, tags: &[&str], minutes: i64) -> TrackedInterval {
        TrackedInterval::new(
            id,
            ts(9, 0),
            Some(ts(9, 0) + Duration::minutes(minutes)),
            tags.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn group_label_strips_category_tag_and_title_cases_the_rest() {
        let mut entry = CategoryEntry::new(Category::classify("guildX").unwrap());
        entry.add_interval(&interval(1, &["guildX", "frontend"], 30));

        let groups: Vec<_> = entry.groups().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "Frontend");
    }

    #[test]
    fn group_label_joins_surviving_tags_in_original_order() {
        let mut entry = CategoryEntry::new(Category::classify("t123").unwrap());
        entry.add_interval(&interval(1, &["review", "t123", "backend"], 30));

        let groups: Vec<_> = entry.groups().collect();
        assert_eq!(groups[0].0, "Review, Backend");
    }

    #[test]
    fn task_entry_strips_every_reference_tag_from_labels() {
        let mut entry = CategoryEntry::new(Category::classify("t123").unwrap());
        entry.add_interval(&interval(1, &["t123", "at45", "bug"], 30));

        let groups: Vec<_> = entry.groups().collect();
        assert_eq!(groups[0].0, "Bug");
    }

    #[test]
    fn interval_without_extra_tags_lands_in_the_empty_group() {
        let mut entry = CategoryEntry::new(Category::Standup);
        entry.add_interval(&interval(1, &["standup"], 15));
        entry.add_interval(&interval(2, &["standup", "retro"], 15));

        let groups: Vec<_> = entry.groups().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "");
        assert_eq!(groups[1].0, "Retro");
    }

    #[test]
    fn same_label_accumulates_in_attach_order() {
        let mut entry = CategoryEntry::new(Category::Guild);
        entry.add_interval(&interval(2, &["guild", "frontend"], 30));
        entry.add_interval(&interval(5, &["guild", "frontend"], 45));

        let groups: Vec<_> = entry.groups().collect();
        let ids: Vec<u32> = groups[0].1.iter().map(TrackedInterval::id).collect();
        assert_eq!(ids, [2, 5]);
    }

    #[test]
    fn entry_total_sums_all_groups() {
        let now = ts(23, 0);
        let mut entry = CategoryEntry::new(Category::Guild);
        entry.add_interval(&interval(1, &["guild", "frontend"], 30));
        entry.add_interval(&interval(2, &["guild"], 45));

        assert_eq!(entry.total(now), Duration::minutes(75));
    }

    #[test]
    fn pretty_label_appends_fetched_title() {
        let mut entry = CategoryEntry::new(Category::classify("t123").unwrap());
        assert_eq!(entry.pretty_label(), "T123");

        entry.set_metadata(TaskMetadata {
            title: "Fix login flow".to_string(),
            tags: vec!["bug".to_string()],
        });
        assert_eq!(entry.pretty_label(), "T123 (Fix login flow)");
    }
}
