//! Octocrab-backed gateway for listing pull requests and their files.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};

use crate::error::TriageError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};
use crate::github::models::{ApiFile, ApiPullRequestSummary, FileChange, PullRequestSummary};
use crate::github::pagination::PageInfo;

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::{PullRequestFilesGateway, RepositoryGateway};

mod types;

pub use types::{ListPullRequestsParams, PaginatedPullRequests, SortDirection};

/// Only open pull requests are ever triaged.
const OPEN_STATE: &str = "open";

/// Largest page size GitHub accepts.
const MAX_PER_PAGE: u8 = 100;

/// Octocrab-backed read gateway.
#[derive(Clone)]
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and repository locator.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidUrl` when the base URI cannot be parsed or
    /// `TriageError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, TriageError> {
        let octocrab = build_octocrab_client(token, locator)?;
        Ok(Self::new(octocrab))
    }

    /// Borrow the underlying client, e.g. to share it with the write gateway.
    #[must_use]
    pub const fn client(&self) -> &Octocrab {
        &self.client
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabGateway {
    async fn list_pull_requests(
        &self,
        locator: &RepositoryLocator,
        params: &ListPullRequestsParams,
    ) -> Result<PaginatedPullRequests, TriageError> {
        validate_pagination_params(params.page, params.per_page)?;

        let mut query_params = vec![
            ("state", OPEN_STATE.to_owned()),
            ("sort", "created".to_owned()),
            ("direction", params.direction.as_str().to_owned()),
            ("page", params.page.to_string()),
            ("per_page", params.per_page.to_string()),
        ];
        if let Some(base) = &params.base {
            query_params.push(("base", base.clone()));
        }

        let page_result: Page<ApiPullRequestSummary> = self
            .client
            .get(locator.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        let has_next = page_result.next.is_some();
        let items: Vec<PullRequestSummary> = page_result
            .items
            .into_iter()
            .map(ApiPullRequestSummary::into)
            .collect();

        Ok(PaginatedPullRequests {
            items,
            page_info: PageInfo::new(params.page).with_has_next(has_next),
        })
    }
}

#[async_trait]
impl PullRequestFilesGateway for OctocrabGateway {
    async fn pull_request_files(
        &self,
        locator: &RepositoryLocator,
        number: u64,
    ) -> Result<Vec<FileChange>, TriageError> {
        let per_page = MAX_PER_PAGE.to_string();
        let query_params = [("per_page", per_page.as_str())];
        let first_page = self
            .client
            .get::<Page<ApiFile>, _, _>(locator.pull_files_path(number), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("pull request files", &error))?;

        self.client
            .all_pages(first_page)
            .await
            .map(|files| files.into_iter().map(ApiFile::into).collect())
            .map_err(|error| map_octocrab_error("pull request files", &error))
    }
}

fn validate_pagination_params(page: u32, per_page: u8) -> Result<(), TriageError> {
    if page == 0 {
        return Err(TriageError::InvalidPagination {
            message: "page must be at least 1".to_owned(),
        });
    }

    if per_page == 0 {
        return Err(TriageError::InvalidPagination {
            message: "per_page must be at least 1".to_owned(),
        });
    }

    if per_page > MAX_PER_PAGE {
        return Err(TriageError::InvalidPagination {
            message: format!("per_page must not exceed {MAX_PER_PAGE}"),
        });
    }

    Ok(())
}
