//! GitHub access for the triage pipeline.
//!
//! This module wraps Octocrab behind small gateway traits for listing open
//! pull requests, reading their changed files, and applying labels and
//! comments. Errors are mapped into [`TriageError`](crate::TriageError)
//! variants so callers never see Octocrab internals.

pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;

pub use gateway::{
    DryRunMutations, ListPullRequestsParams, MutationGateway, OctocrabGateway,
    OctocrabMutationGateway, PaginatedPullRequests, PullRequestFilesGateway, RepositoryGateway,
    SortDirection,
};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{FileChange, PullRequestSummary};
pub use pagination::PageInfo;

#[cfg(test)]
pub use gateway::{MockMutationGateway, MockPullRequestFilesGateway, MockRepositoryGateway};
