//! Input for restarting pull requests whose checks failed.
//!
//! The failure report is a JSON document listing pull requests and the
//! failure each one hit:
//!
//! ```json
//! { "prs": [{ "number": 17, "errorDesc": "timeout" }] }
//! ```
//!
//! Pull requests whose failure is `unknown error` are logged but left alone.

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::TriageError;
use crate::storage::read_text;

/// Failure description that never triggers a restart.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// One pull request named in a failure report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloseReopenTarget {
    /// Pull request number.
    pub number: u64,
    /// What went wrong with its checks.
    #[serde(rename = "errorDesc")]
    pub error_description: String,
}

impl CloseReopenTarget {
    /// True when closing and reopening could help.
    #[must_use]
    pub fn needs_restart(&self) -> bool {
        self.error_description != UNKNOWN_ERROR
    }
}

#[derive(Deserialize)]
struct FailureReport {
    prs: Vec<CloseReopenTarget>,
}

/// Parses a failure report.
///
/// # Errors
///
/// Returns [`TriageError::Configuration`] for malformed JSON or a report
/// with no pull requests.
pub fn parse_targets(source: &str, content: &str) -> Result<Vec<CloseReopenTarget>, TriageError> {
    let report: FailureReport =
        serde_json::from_str(content).map_err(|error| TriageError::Configuration {
            message: format!("failure report '{source}' is malformed: {error}"),
        })?;
    if report.prs.is_empty() {
        return Err(TriageError::Configuration {
            message: format!("failure report '{source}' lists no pull requests"),
        });
    }
    Ok(report.prs)
}

/// Reads and parses the failure report at `path`.
///
/// # Errors
///
/// Returns [`TriageError::Io`] when the file cannot be read, otherwise the
/// errors of [`parse_targets`].
pub fn load_targets(path: &Utf8Path) -> Result<Vec<CloseReopenTarget>, TriageError> {
    let content = read_text(path, "failure report")?;
    parse_targets(path.as_str(), &content)
}
