//! Phabricator Conduit integration for the timesheet tool.
//!
//! Resolves task numbers to their title and project tags via
//! `maniphest.search` and `project.search`. The client is async; callers
//! that need a synchronous lookup drive it with a runtime.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default request timeout for Conduit calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Conduit client errors.
#[derive(Debug, Error)]
pub enum ConduitError {
    /// The provided API token was invalid.
    #[error("invalid API token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Conduit returned an error response.
    #[error("Conduit error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// No task with this number exists on the instance.
    #[error("task T{number} not found")]
    NotFound { number: u32 },
}

/// Title and project tags of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub title: String,
    /// Project slugs attached to the task, usable as classification tags.
    pub projects: Vec<String>,
}

/// Conduit API client for one Phabricator instance.
///
/// Safe to clone; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the given instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if the
    /// HTTP client fails to build.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, ConduitError> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(ConduitError::InvalidToken {
                reason: "API token cannot be empty",
            });
        }
        if api_token.trim().is_empty() {
            return Err(ConduitError::InvalidToken {
                reason: "API token cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ConduitError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        })
    }

    /// Looks up one task by number, resolving its project PHIDs to slugs.
    pub async fn task_info(&self, number: u32) -> Result<TaskInfo, ConduitError> {
        let params = vec![
            ("constraints[ids][0]".to_string(), number.to_string()),
            ("attachments[projects]".to_string(), "1".to_string()),
        ];
        let search: SearchResult<TaskRecord> = self.call("maniphest.search", params).await?;

        let Some(task) = search.data.into_iter().next() else {
            return Err(ConduitError::NotFound { number });
        };

        let phids = task
            .attachments
            .projects
            .map(|projects| projects.project_phids)
            .unwrap_or_default();
        let projects = self.project_slugs(&phids).await?;

        Ok(TaskInfo {
            title: task.fields.name,
            projects,
        })
    }

    /// Resolves project PHIDs to their slugs.
    async fn project_slugs(&self, phids: &[String]) -> Result<Vec<String>, ConduitError> {
        if phids.is_empty() {
            return Ok(Vec::new());
        }

        let params = phids
            .iter()
            .enumerate()
            .map(|(index, phid)| (format!("constraints[phids][{index}]"), phid.clone()))
            .collect();
        let search: SearchResult<ProjectRecord> = self.call("project.search", params).await?;

        Ok(search
            .data
            .into_iter()
            .map(|project| project.fields.slug)
            .collect())
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<T, ConduitError> {
        params.push(("api.token".to_string(), self.api_token.clone()));

        let url = format!("{}/api/{method}", self.base_url);
        let response = self.http.post(url).form(&params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_error_envelope(&body).unwrap_or_else(|| ConduitError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|err| ConduitError::InvalidResponse(err.to_string()))?;
        if let Some(code) = envelope.error_code {
            return Err(ConduitError::Api {
                message: format!("{code}: {}", envelope.error_info.unwrap_or_default()),
            });
        }
        envelope
            .result
            .ok_or_else(|| ConduitError::InvalidResponse("missing result".to_string()))
    }
}

/// Standard Conduit response wrapper.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error_code: Option<String>,
    error_info: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct SearchResult<T> {
    #[serde(default)]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TaskRecord {
    fields: TaskFields,
    #[serde(default)]
    attachments: TaskAttachments,
}

#[derive(Debug, Deserialize)]
struct TaskFields {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct TaskAttachments {
    projects: Option<ProjectAttachment>,
}

#[derive(Debug, Deserialize)]
struct ProjectAttachment {
    #[serde(rename = "projectPHIDs", default)]
    project_phids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectRecord {
    fields: ProjectFields,
}

#[derive(Debug, Deserialize)]
struct ProjectFields {
    slug: String,
}

fn parse_error_envelope(body: &str) -> Option<ConduitError> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).ok()?;
    envelope.error_code.map(|code| ConduitError::Api {
        message: format!("{code}: {}", envelope.error_info.unwrap_or_default()),
    })
}
