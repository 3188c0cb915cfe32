//! Triage of open pull requests: window selection, bounded retrieval,
//! classification, label diffing, throttling, the sequential runner and
//! restarts of failed pull requests.

pub mod classifier;
pub mod close_reopen;
pub mod comment;
pub mod diff;
pub mod guide_checks;
pub mod paginator;
pub mod range;
pub mod runner;
pub mod throttle;

pub use classifier::{Classification, LabelClassifier, local_test_backfill_candidates};
pub use close_reopen::{CloseReopenTarget, load_targets};
pub use diff::{LabelDecision, diff};
pub use guide_checks::{GuideFinding, GuideIssue, check_guide_files};
pub use paginator::{BoundedPaginator, PageFilter, PageStep, PullRequestField};
pub use range::{PrWindow, RunMode, discover_open_window, resolve, validate_request};
pub use runner::{CloseReopenReport, Gateways, RunReport, RunRequest, RunSettings, TriageRunner};
pub use throttle::RateLimiter;
