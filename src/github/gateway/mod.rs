//! Gateways for reading and labelling pull requests through Octocrab.
//!
//! The triage pipeline only sees the traits defined here. Octocrab-backed
//! implementations perform real HTTP requests, while [`DryRunMutations`]
//! stands in for the write side when a run is not in production mode.

mod client;
mod error_mapping;
mod mutation;
mod repository;

pub use mutation::{DryRunMutations, OctocrabMutationGateway};
pub use repository::{ListPullRequestsParams, OctocrabGateway, PaginatedPullRequests, SortDirection};

use async_trait::async_trait;

use crate::error::TriageError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::FileChange;

/// Gateway for listing pull requests one page at a time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// List a single page of pull requests for the repository.
    async fn list_pull_requests(
        &self,
        locator: &RepositoryLocator,
        params: &ListPullRequestsParams,
    ) -> Result<PaginatedPullRequests, TriageError>;
}

/// Gateway for reading the files a pull request changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestFilesGateway: Send + Sync {
    /// Fetch every changed file for the pull request, across all pages.
    async fn pull_request_files(
        &self,
        locator: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<FileChange>, TriageError>;
}

/// Gateway for the write operations a triage run performs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MutationGateway: Send + Sync {
    /// Attach labels to the pull request, keeping the ones already present.
    async fn add_labels(
        &self,
        locator: &RepositoryLocator,
        number: u64,
        labels: &[String],
    ) -> Result<(), TriageError>;

    /// Post an issue comment on the pull request.
    async fn add_comment(
        &self,
        locator: &RepositoryLocator,
        number: u64,
        body: &str,
    ) -> Result<(), TriageError>;

    /// Close the pull request and open it again, which restarts its checks.
    async fn close_reopen(
        &self,
        locator: &RepositoryLocator,
        number: u64,
    ) -> Result<(), TriageError>;
}
