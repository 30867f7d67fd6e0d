//! Pluggable task metadata retrieval.
//!
//! The report core never talks to a tracker itself. A caller may supply a
//! [`TaskFetcher`] to resolve a task reference to its title and tags; without
//! one, task entries render from their identifier alone. Fetch failures are
//! reported as values and must never abort report generation.

use thiserror::Error;

use crate::category::TaskRef;

/// Title and tags resolved for a reference task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMetadata {
    pub title: String,
    /// Tracker-side tags, usable for classifying later intervals that carry
    /// the same identifier.
    pub tags: Vec<String>,
}

/// Errors a metadata fetch can report.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The tracker has no task with this identifier.
    #[error("task {id} not found")]
    NotFound { id: String },

    /// The tracker could not be reached or answered unusably.
    #[error("metadata fetch failed: {message}")]
    Backend { message: String },
}

/// Resolves task references to their metadata.
///
/// Implementations are expected to block until the lookup completes; the
/// report is built synchronously.
pub trait TaskFetcher {
    fn fetch(&self, task: &TaskRef) -> Result<TaskMetadata, FetchError>;
}
