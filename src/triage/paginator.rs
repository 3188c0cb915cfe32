//! Early-exit traversal of the open pull request listing.
//!
//! GitHub has no server-side filter on pull request numbers, so the listing
//! is walked in ascending creation order and traversal stops as soon as a
//! record reaches the upper bound of the window.

use std::collections::BTreeSet;

use crate::error::TriageError;
use crate::github::{
    ListPullRequestsParams, PullRequestSummary, RepositoryGateway, RepositoryLocator,
};

use super::range::PrWindow;

/// Optional pull request fields to keep on retrieved records.
///
/// The number is always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestField {
    /// Attached label names.
    Labels,
    /// Author login.
    Author,
}

/// Outcome of processing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStep {
    /// The upper bound was not reached; fetch the next page if one exists.
    KeepPaging {
        /// In-window records from this page.
        kept: Vec<PullRequestSummary>,
    },
    /// A record at or past the upper bound was seen; stop fetching.
    Stop {
        /// In-window records from this page, including the boundary record
        /// when it is inside the window.
        kept: Vec<PullRequestSummary>,
    },
}

/// Filters pages against a window while checking ascending order.
#[derive(Debug, Clone)]
pub struct PageFilter<'a> {
    window: PrWindow,
    fields: &'a [PullRequestField],
    last_seen: Option<u64>,
}

impl<'a> PageFilter<'a> {
    /// Creates a filter for `window` keeping the given optional `fields`.
    #[must_use]
    pub const fn new(window: PrWindow, fields: &'a [PullRequestField]) -> Self {
        Self {
            window,
            fields,
            last_seen: None,
        }
    }

    /// Processes the next page of records.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::UnsortedPage`] when a record is not strictly
    /// greater than the one before it, including across page boundaries.
    pub fn process(&mut self, items: Vec<PullRequestSummary>) -> Result<PageStep, TriageError> {
        let mut kept = Vec::new();
        for item in items {
            let number = item.number;
            match self.last_seen {
                Some(previous) if number <= previous => {
                    return Err(TriageError::UnsortedPage {
                        previous,
                        next: number,
                    });
                }
                _ => {}
            }
            self.last_seen = Some(number);

            if self.window.contains(number) {
                kept.push(self.project(item));
            }
            if number >= self.window.last() {
                return Ok(PageStep::Stop { kept });
            }
        }
        Ok(PageStep::KeepPaging { kept })
    }

    fn project(&self, item: PullRequestSummary) -> PullRequestSummary {
        PullRequestSummary {
            number: item.number,
            labels: if self.fields.contains(&PullRequestField::Labels) {
                item.labels
            } else {
                BTreeSet::new()
            },
            author: if self.fields.contains(&PullRequestField::Author) {
                item.author
            } else {
                None
            },
        }
    }
}

/// Walks listing pages until the window's upper bound or the last page.
pub struct BoundedPaginator<'a, G: ?Sized> {
    gateway: &'a G,
    locator: &'a RepositoryLocator,
    params: ListPullRequestsParams,
}

impl<'a, G> BoundedPaginator<'a, G>
where
    G: RepositoryGateway + ?Sized,
{
    /// Creates a paginator issuing `params` (from page 1) against `locator`.
    #[must_use]
    pub fn new(
        gateway: &'a G,
        locator: &'a RepositoryLocator,
        params: ListPullRequestsParams,
    ) -> Self {
        Self {
            gateway,
            locator,
            params: params.at_page(1),
        }
    }

    /// Retrieves every open pull request numbered within `window`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures and [`TriageError::UnsortedPage`].
    pub async fn paginate(
        &self,
        window: PrWindow,
        fields: &[PullRequestField],
    ) -> Result<Vec<PullRequestSummary>, TriageError> {
        let mut filter = PageFilter::new(window, fields);
        let mut collected = Vec::new();
        let mut params = self.params.clone();

        loop {
            let page = self.gateway.list_pull_requests(self.locator, &params).await?;
            tracing::debug!(
                page = page.page_info.current_page(),
                records = page.items.len(),
                "fetched pull request page"
            );
            let has_next = page.page_info.has_next();
            match filter.process(page.items)? {
                PageStep::Stop { kept } => {
                    collected.extend(kept);
                    break;
                }
                PageStep::KeepPaging { kept } => {
                    collected.extend(kept);
                    if !has_next {
                        break;
                    }
                    params = params.at_page(page.page_info.next_page());
                }
            }
        }

        tracing::info!(
            first = window.first(),
            last = window.last(),
            retrieved = collected.len(),
            "retrieved open pull requests in window"
        );
        Ok(collected)
    }
}
