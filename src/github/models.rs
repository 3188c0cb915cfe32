//! Data models for open pull requests and the files they change.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into the public domain types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Snapshot of an open pull request taken once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullRequestSummary {
    /// Pull request number.
    pub number: u64,
    /// Names of the labels attached when the snapshot was taken.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub labels: BTreeSet<String>,
    /// Author login if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A file touched by a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Repository-relative path.
    pub path: String,
    /// Platform status such as `added`, `modified` or `removed`.
    pub status: Option<String>,
}

impl FileChange {
    /// Creates a change record without a status.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: None,
        }
    }

    /// Returns true when the pull request deletes this file.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.status.as_deref() == Some("removed")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLabel {
    pub(super) name: String,
}

/// API response type for PR listing.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequestSummary {
    pub(super) number: u64,
    #[serde(default)]
    pub(super) labels: Vec<ApiLabel>,
    pub(super) user: Option<ApiUser>,
}

/// API response type for the pull request files endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiFile {
    pub(super) filename: String,
    pub(super) status: Option<String>,
}

impl From<ApiPullRequestSummary> for PullRequestSummary {
    fn from(value: ApiPullRequestSummary) -> Self {
        Self {
            number: value.number,
            labels: value.labels.into_iter().map(|label| label.name).collect(),
            author: value.user.and_then(|user| user.login),
        }
    }
}

impl From<ApiFile> for FileChange {
    fn from(value: ApiFile) -> Self {
        Self {
            path: value.filename,
            status: value.status,
        }
    }
}
