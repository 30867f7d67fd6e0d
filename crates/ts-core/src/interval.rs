//! Tracked time intervals consumed from a tracker export.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded span of time with a start, optional end, and free-form tags.
///
/// Intervals are read-only input: the tracker assigns the numeric `@N` id and
/// writes timestamps in its compact export form (`20260115T103000Z`). An
/// absent end means the interval is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedInterval {
    /// Identifier assigned by the exporting tracker, rendered as `@N`.
    id: u32,

    /// When tracking started.
    #[serde(with = "export_time")]
    start: DateTime<Utc>,

    /// When tracking stopped; `None` while the interval is still open.
    #[serde(default, with = "opt_export_time", skip_serializing_if = "Option::is_none")]
    end: Option<DateTime<Utc>>,

    /// Tags in export order. Duplicates are dropped on load, first
    /// occurrence wins, so iteration order is the export array order.
    #[serde(default, deserialize_with = "unique_tags")]
    tags: Vec<String>,
}

impl TrackedInterval {
    /// Creates an interval, de-duplicating tags while preserving order.
    pub fn new(
        id: u32,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id,
            start,
            end,
            tags: dedup_preserving_order(tags),
        }
    }

    pub const fn id(&self) -> u32 {
        self.id
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Tags in their original export order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// True while the interval has no end yet.
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Elapsed time, using `now` as the end while the interval is open.
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.end.unwrap_or(now) - self.start
    }

    /// True for a closed interval of zero length.
    pub fn is_empty(&self) -> bool {
        self.end == Some(self.start)
    }

    /// True when the interval intersects the half-open range `[from, to)`.
    /// An open interval extends indefinitely past its start.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.start < to && self.end.is_none_or(|end| end > from)
    }
}

fn dedup_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

fn unique_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(dedup_preserving_order(raw))
}

/// Timestamp format used by the tracker's export: `20260115T103000Z`.
mod export_time {
    use super::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y%m%dT%H%M%SZ";

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw, FORMAT).map(|naive| naive.and_utc())
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

mod opt_export_time {
    use super::{DateTime, Utc, export_time};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(end) => export_time::serialize(end, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| export_time::parse(&raw))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
