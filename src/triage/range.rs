//! Resolution of the pull request number window a run covers.

use std::str::FromStr;

use crate::error::TriageError;
use crate::github::{ListPullRequestsParams, RepositoryGateway, RepositoryLocator, SortDirection};

/// How the operator selected pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Every currently open pull request.
    All,
    /// An explicit subrange of the open pull requests.
    Range,
}

impl FromStr for RunMode {
    type Err = TriageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "range" => Ok(Self::Range),
            other => Err(TriageError::InvalidMode {
                mode: other.to_owned(),
            }),
        }
    }
}

/// Inclusive window of pull request numbers; `first <= last` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrWindow {
    first: u64,
    last: u64,
}

impl PrWindow {
    /// Creates a window, rejecting empty or inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidRange`] when `first > last` or either
    /// bound is zero.
    pub fn new(first: u64, last: u64) -> Result<Self, TriageError> {
        if first == 0 || last == 0 {
            return Err(invalid_range("PR numbers must be positive integers"));
        }
        if first > last {
            return Err(invalid_range(
                "starting PR # must be less than or equal to ending PR #",
            ));
        }
        Ok(Self { first, last })
    }

    /// Lowest number in the window.
    #[must_use]
    pub const fn first(&self) -> u64 {
        self.first
    }

    /// Highest number in the window.
    #[must_use]
    pub const fn last(&self) -> u64 {
        self.last
    }

    /// Returns true when `number` lies inside the window.
    #[must_use]
    pub const fn contains(&self, number: u64) -> bool {
        number >= self.first && number <= self.last
    }
}

fn invalid_range(message: &str) -> TriageError {
    TriageError::InvalidRange {
        message: message.to_owned(),
    }
}

fn parse_bound(raw: Option<&str>) -> Result<u64, TriageError> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|number| *number > 0)
        .ok_or_else(|| {
            invalid_range(
                "please specify both a starting PR # (2nd arg) and ending PR # (3rd arg)",
            )
        })
}

/// Validates the CLI selection without consulting GitHub.
///
/// Returns the requested window for `range` and `None` for `all`.
///
/// # Errors
///
/// Returns [`TriageError::InvalidMode`] for an unknown mode token and
/// [`TriageError::InvalidRange`] when a requested range is incomplete or
/// inverted.
pub fn validate_request(
    mode: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<PrWindow>, TriageError> {
    match mode.parse::<RunMode>()? {
        RunMode::All => Ok(None),
        RunMode::Range => {
            let first = parse_bound(start)?;
            let last = parse_bound(end)?;
            PrWindow::new(first, last).map(Some)
        }
    }
}

/// Resolves the window to process from the CLI selection and the bounds of
/// the currently open pull requests.
///
/// # Errors
///
/// Returns [`TriageError::InvalidMode`] for an unknown mode token and
/// [`TriageError::InvalidRange`] when a requested range is incomplete,
/// inverted, or outside the open window.
pub fn resolve(
    mode: &str,
    start: Option<&str>,
    end: Option<&str>,
    open: PrWindow,
) -> Result<PrWindow, TriageError> {
    let Some(requested) = validate_request(mode, start, end)? else {
        return Ok(open);
    };
    if requested.first < open.first {
        return Err(TriageError::InvalidRange {
            message: format!(
                "starting PR # can not be less than first open PR # ({})",
                open.first
            ),
        });
    }
    if requested.last > open.last {
        return Err(TriageError::InvalidRange {
            message: format!(
                "ending PR # can not be greater than last open PR # ({})",
                open.last
            ),
        });
    }
    Ok(requested)
}

/// Finds the lowest and highest open pull request numbers on `base`.
///
/// Returns `None` when nothing is open.
///
/// # Errors
///
/// Propagates gateway failures.
pub async fn discover_open_window<G>(
    gateway: &G,
    locator: &RepositoryLocator,
    base: Option<&str>,
) -> Result<Option<PrWindow>, TriageError>
where
    G: RepositoryGateway + ?Sized,
{
    let oldest = newest_or_oldest(gateway, locator, base, SortDirection::Ascending).await?;
    let newest = newest_or_oldest(gateway, locator, base, SortDirection::Descending).await?;
    match (oldest, newest) {
        (Some(first), Some(last)) => PrWindow::new(first, last).map(Some),
        _ => Ok(None),
    }
}

async fn newest_or_oldest<G>(
    gateway: &G,
    locator: &RepositoryLocator,
    base: Option<&str>,
    direction: SortDirection,
) -> Result<Option<u64>, TriageError>
where
    G: RepositoryGateway + ?Sized,
{
    let params = ListPullRequestsParams {
        base: base.map(ToOwned::to_owned),
        direction,
        per_page: 1,
        ..ListPullRequestsParams::default()
    };
    let page = gateway.list_pull_requests(locator, &params).await?;
    Ok(page.items.first().map(|pr| pr.number))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, function};
    use rstest::{fixture, rstest};

    use super::{PrWindow, RunMode, discover_open_window, resolve, validate_request};
    use crate::error::TriageError;
    use crate::github::{
        ListPullRequestsParams, MockRepositoryGateway, PageInfo, PaginatedPullRequests,
        PullRequestSummary, RepositoryLocator, SortDirection,
    };

    #[fixture]
    fn open() -> PrWindow {
        PrWindow::new(100, 500).expect("open window should be valid")
    }

    #[rstest]
    fn all_returns_open_bounds_unchanged(open: PrWindow) {
        assert_eq!(resolve("all", None, None, open), Ok(open));
    }

    #[rstest]
    fn all_ignores_stray_bounds(open: PrWindow) {
        assert_eq!(resolve("all", Some("1"), Some("2"), open), Ok(open));
    }

    #[rstest]
    fn range_within_open_window_is_accepted(open: PrWindow) {
        let window = resolve("range", Some("150"), Some("150"), open).expect("should resolve");
        assert_eq!((window.first(), window.last()), (150, 150));
    }

    #[rstest]
    #[case::inverted(Some("10"), Some("5"))]
    #[case::missing_end(Some("150"), None)]
    #[case::missing_start(None, Some("150"))]
    #[case::non_numeric(Some("abc"), Some("200"))]
    #[case::zero(Some("0"), Some("200"))]
    #[case::below_open(Some("99"), Some("200"))]
    #[case::above_open(Some("150"), Some("501"))]
    fn range_rejects_bad_bounds(
        open: PrWindow,
        #[case] start: Option<&str>,
        #[case] end: Option<&str>,
    ) {
        let result = resolve("range", start, end, open);
        assert!(
            matches!(result, Err(TriageError::InvalidRange { .. })),
            "expected InvalidRange, got {result:?}"
        );
    }

    #[rstest]
    fn start_greater_than_end_is_invalid_range_even_outside_open_window() {
        let wide = PrWindow::new(1, 1_000).expect("window should be valid");
        let result = resolve("range", Some("10"), Some("5"), wide);
        assert!(matches!(result, Err(TriageError::InvalidRange { .. })));
    }

    #[rstest]
    #[case::both("both")]
    #[case::empty("")]
    #[case::uppercase("ALL")]
    fn unknown_modes_are_rejected(open: PrWindow, #[case] mode: &str) {
        assert_eq!(
            resolve(mode, None, None, open),
            Err(TriageError::InvalidMode {
                mode: mode.to_owned()
            })
        );
    }

    #[rstest]
    fn validation_needs_no_open_window() {
        assert_eq!(validate_request("all", None, None), Ok(None));
        assert_eq!(
            validate_request("range", Some("3"), Some("8")),
            Ok(Some(PrWindow::new(3, 8).expect("valid window")))
        );
        assert!(matches!(
            validate_request("range", Some("8"), Some("3")),
            Err(TriageError::InvalidRange { .. })
        ));
    }

    #[rstest]
    fn run_mode_parses_known_tokens() {
        assert_eq!("all".parse::<RunMode>(), Ok(RunMode::All));
        assert_eq!("range".parse::<RunMode>(), Ok(RunMode::Range));
    }

    fn single(number: u64) -> PaginatedPullRequests {
        PaginatedPullRequests {
            items: vec![PullRequestSummary {
                number,
                ..PullRequestSummary::default()
            }],
            page_info: PageInfo::new(1),
        }
    }

    #[tokio::test]
    async fn discovers_open_window_from_both_ends() {
        let locator = RepositoryLocator::from_owner_repo("octo", "repo")
            .expect("should create repository locator");
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_list_pull_requests()
            .with(
                always(),
                function(|params: &ListPullRequestsParams| {
                    params.direction == SortDirection::Ascending && params.per_page == 1
                }),
            )
            .times(1)
            .returning(|_, _| Ok(single(12)));
        gateway
            .expect_list_pull_requests()
            .with(
                always(),
                function(|params: &ListPullRequestsParams| {
                    params.direction == SortDirection::Descending
                        && params.base.as_deref() == Some("master")
                }),
            )
            .times(1)
            .returning(|_, _| Ok(single(480)));

        let window = discover_open_window(&gateway, &locator, Some("master"))
            .await
            .expect("discovery should succeed");

        assert_eq!(window, Some(PrWindow::new(12, 480).expect("valid window")));
    }

    #[tokio::test]
    async fn no_open_pull_requests_yields_none() {
        let locator = RepositoryLocator::from_owner_repo("octo", "repo")
            .expect("should create repository locator");
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_list_pull_requests().times(2).returning(|_, _| {
            Ok(PaginatedPullRequests {
                items: Vec::new(),
                page_info: PageInfo::new(1),
            })
        });

        let window = discover_open_window(&gateway, &locator, None)
            .await
            .expect("discovery should succeed");

        assert_eq!(window, None);
    }
}
