//! Tag classification into timesheet categories.
//!
//! A tag either identifies a category (a fixed bucket such as Guild, or a
//! Phabricator task reference such as `t123`) or it is an ordinary
//! descriptive label. All matching is done on lower-cased tag text.

use std::cmp::Ordering;
use std::fmt;

/// Phabricator instance a task reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tracker {
    /// `t<digits>` tags.
    Collabora,
    /// `at<digits>` tags.
    Apertis,
}

impl Tracker {
    /// Base URL of the tracker instance.
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Collabora => "https://phabricator.collabora.org",
            Self::Apertis => "https://phabricator.apertis.org",
        }
    }
}

/// A reference-task identifier parsed from a tag.
///
/// Recognized forms are `t<digits>` (Collabora) and `at<digits>` (Apertis),
/// where the digits parse to a nonzero integer. Anything else, including a
/// zero id or trailing garbage after the digits, is not a task reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    system: Tracker,
    number: u32,
    id: String,
}

impl TaskRef {
    /// Parses a tag into a task reference, if it is one.
    pub fn parse(tag: &str) -> Option<Self> {
        let id = tag.to_lowercase();
        let (system, digits) = if let Some(rest) = id.strip_prefix("at") {
            (Tracker::Apertis, rest)
        } else if let Some(rest) = id.strip_prefix('t') {
            (Tracker::Collabora, rest)
        } else {
            return None;
        };

        match digits.parse::<u32>() {
            Ok(number) if number > 0 => Some(Self { system, number, id }),
            _ => None,
        }
    }

    /// The lower-cased identifier, e.g. `t123`. Doubles as the category key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Numeric task id within its tracker.
    pub const fn number(&self) -> u32 {
        self.number
    }

    pub const fn system(&self) -> Tracker {
        self.system
    }

    /// Deep link to the task.
    pub fn uri(&self) -> String {
        format!("{}/T{}", self.system.base_url(), self.number)
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// One category bucket an interval can be classified into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Guild,
    Standup,
    Induction,
    Task(TaskRef),
}

impl Category {
    /// Classifies a tag, returning the category it identifies if any.
    ///
    /// The prefixes are disjoint, so at most one variant matches.
    pub fn classify(tag: &str) -> Option<Self> {
        let tag = tag.to_lowercase();

        if let Some(task) = TaskRef::parse(&tag) {
            return Some(Self::Task(task));
        }
        if tag.starts_with("guild") {
            return Some(Self::Guild);
        }
        if tag.starts_with("standup") {
            return Some(Self::Standup);
        }
        if tag.starts_with("induction") {
            return Some(Self::Induction);
        }
        None
    }

    /// Stable key used to de-duplicate entries within one day.
    pub fn key(&self) -> &str {
        match self {
            Self::Guild => "guild",
            Self::Standup => "standup",
            Self::Induction => "induction",
            Self::Task(task) => task.id(),
        }
    }

    /// Display label: a fixed literal, or the upper-cased task identifier.
    pub fn pretty_id(&self) -> String {
        match self {
            Self::Guild => "Guild".to_string(),
            Self::Standup => "Standup".to_string(),
            Self::Induction => "Induction".to_string(),
            Self::Task(task) => task.id().to_uppercase(),
        }
    }

    /// Deep link for task references; empty for fixed categories.
    pub fn uri(&self) -> String {
        match self {
            Self::Task(task) => task.uri(),
            _ => String::new(),
        }
    }

    /// True when the (lower-cased) tag identifies this category.
    ///
    /// For task entries this matches any task-reference tag, not only the
    /// entry's own id, so every reference tag is stripped from group labels.
    pub fn is_category_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        match self {
            Self::Guild => tag.starts_with("guild"),
            Self::Standup => tag.starts_with("standup"),
            Self::Induction => tag.starts_with("induction"),
            Self::Task(_) => TaskRef::parse(&tag).is_some(),
        }
    }

    /// Fixed categories sort before tasks, in declaration order.
    const fn rank(&self) -> u8 {
        match self {
            Self::Guild => 0,
            Self::Standup => 1,
            Self::Induction => 2,
            Self::Task(_) => 3,
        }
    }
}

impl Ord for Category {
    /// Deterministic report order: fixed categories by priority, then task
    /// references ascending by numeric id (identifier breaks ties between
    /// trackers).
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Task(a), Self::Task(b)) => a
                .number()
                .cmp(&b.number())
                .then_with(|| a.id().cmp(b.id())),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guild_prefix_classifies_as_guild() {
        assert_eq!(Category::classify("guild"), Some(Category::Guild));
        assert_eq!(Category::classify("GuildFrontend"), Some(Category::Guild));
    }

    #[test]
    fn standup_prefix_classifies_as_standup() {
        assert_eq!(Category::classify("standup"), Some(Category::Standup));
        assert_eq!(Category::classify("standup-team"), Some(Category::Standup));
    }

    #[test]
    fn induction_prefix_classifies_as_induction() {
        assert_eq!(Category::classify("induction"), Some(Category::Induction));
        assert_eq!(
            Category::classify("induction-day"),
            Some(Category::Induction)
        );
    }

    #[test]
    fn guild_prefix_does_not_reach_induction() {
        // Prefix matching anchors at the start of the tag.
        let category = Category::classify("guild-induction").unwrap();
        assert_eq!(category, Category::Guild);
    }

    #[test]
    fn task_tags_parse_with_tracker_and_number() {
        let collabora = TaskRef::parse("t123").unwrap();
        assert_eq!(collabora.system(), Tracker::Collabora);
        assert_eq!(collabora.number(), 123);
        assert_eq!(collabora.uri(), "https://phabricator.collabora.org/T123");

        let apertis = TaskRef::parse("AT45").unwrap();
        assert_eq!(apertis.system(), Tracker::Apertis);
        assert_eq!(apertis.number(), 45);
        assert_eq!(apertis.id(), "at45");
        assert_eq!(apertis.uri(), "https://phabricator.apertis.org/T45");
    }

    #[test]
    fn invalid_task_tags_do_not_classify() {
        assert!(TaskRef::parse("t0").is_none());
        assert!(TaskRef::parse("at0").is_none());
        assert!(TaskRef::parse("tabc").is_none());
        assert!(TaskRef::parse("t12abc").is_none());
        assert!(TaskRef::parse("t").is_none());
        assert!(TaskRef::parse("frontend").is_none());
    }

    #[test]
    fn unrecognized_tags_stay_unclassified() {
        assert_eq!(Category::classify("frontend"), None);
        assert_eq!(Category::classify("review"), None);
    }

    #[test]
    fn task_category_key_is_the_identifier() {
        let category = Category::classify("T123").unwrap();
        assert_eq!(category.key(), "t123");
        assert_eq!(category.pretty_id(), "T123");
        assert_eq!(category.uri(), "https://phabricator.collabora.org/T123");
    }

    #[test]
    fn fixed_categories_have_empty_uri() {
        assert_eq!(Category::Guild.uri(), "");
        assert_eq!(Category::Standup.uri(), "");
        assert_eq!(Category::Induction.uri(), "");
    }

    #[test]
    fn category_tag_predicate_strips_any_task_tag() {
        let entry = Category::classify("t123").unwrap();
        assert!(entry.is_category_tag("t123"));
        assert!(entry.is_category_tag("at45"));
        assert!(!entry.is_category_tag("frontend"));
    }

    #[test]
    fn category_tag_predicate_is_case_insensitive() {
        assert!(Category::Guild.is_category_tag("GuildX"));
        assert!(!Category::Guild.is_category_tag("standup"));
    }

    #[test]
    fn report_order_puts_fixed_categories_before_tasks() {
        let mut categories = vec![
            Category::classify("t9").unwrap(),
            Category::Induction,
            Category::classify("at2").unwrap(),
            Category::Guild,
            Category::classify("t2").unwrap(),
            Category::Standup,
        ];
        categories.sort();

        let keys: Vec<&str> = categories.iter().map(Category::key).collect();
        assert_eq!(keys, ["guild", "standup", "induction", "at2", "t2", "t9"]);
    }
}
