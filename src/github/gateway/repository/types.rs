//! Public types for repository listing operations.

use crate::github::models::PullRequestSummary;
use crate::github::pagination::PageInfo;

/// Ordering of the `created` sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Oldest first, which for pull requests means ascending numbers.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

impl SortDirection {
    /// Returns the API parameter value for this direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Parameters for listing open pull requests sorted by creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPullRequestsParams {
    /// Only pull requests targeting this base branch, when set.
    pub base: Option<String>,
    /// Creation order.
    pub direction: SortDirection,
    /// Page number to fetch (1-based).
    pub page: u32,
    /// Items per page (max 100).
    pub per_page: u8,
}

impl ListPullRequestsParams {
    /// Returns the same query positioned at another page.
    #[must_use]
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

impl Default for ListPullRequestsParams {
    fn default() -> Self {
        Self {
            base: None,
            direction: SortDirection::Ascending,
            page: 1,
            per_page: 100,
        }
    }
}

/// Paginated pull request listing result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedPullRequests {
    /// Pull request summaries on this page.
    pub items: Vec<PullRequestSummary>,
    /// Pagination state.
    pub page_info: PageInfo,
}
