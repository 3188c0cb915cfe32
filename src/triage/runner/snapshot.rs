//! Audit snapshot of the pull requests a run retrieved.

use camino::Utf8Path;
use chrono::NaiveDate;

use crate::error::TriageError;
use crate::github::PullRequestSummary;
use crate::storage::{open_or_create_dir, write_json};
use crate::triage::range::PrWindow;

/// File name for a snapshot, e.g. `open-prs_100-200_2026-10-18.json`.
#[must_use]
pub fn snapshot_file_name(window: PrWindow, date: NaiveDate) -> String {
    format!(
        "open-prs_{}-{}_{}.json",
        window.first(),
        window.last(),
        date.format("%Y-%m-%d")
    )
}

/// Writes `pull_requests` as JSON under `dir`, replacing an earlier snapshot
/// of the same window and day.
///
/// # Errors
///
/// Returns [`TriageError::Io`] when the directory or file cannot be written.
pub fn write_snapshot(
    dir: &Utf8Path,
    window: PrWindow,
    date: NaiveDate,
    pull_requests: &[PullRequestSummary],
) -> Result<(), TriageError> {
    let file_name = snapshot_file_name(window, date);
    let handle = open_or_create_dir(dir, "snapshot")?;
    write_json(&handle, &file_name, &pull_requests)?;
    tracing::info!(
        path = %dir.join(&file_name),
        count = pull_requests.len(),
        "saved pull request snapshot"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use camino::Utf8PathBuf;
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;

    use super::{snapshot_file_name, write_snapshot};
    use crate::github::PullRequestSummary;
    use crate::triage::range::PrWindow;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    #[rstest]
    fn names_snapshot_by_window_and_day() {
        let window = PrWindow::new(100, 200).expect("valid window");
        assert_eq!(
            snapshot_file_name(window, date()),
            "open-prs_100-200_2026-10-18.json"
        );
    }

    #[rstest]
    fn writes_retrieved_pull_requests() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
        let dir = Utf8PathBuf::from_path_buf(temp_dir.path().join("data"))
            .expect("temp path should be UTF-8");
        let window = PrWindow::new(7, 9).expect("valid window");
        let pull_requests = [PullRequestSummary {
            number: 8,
            labels: BTreeSet::from(["scope: guide".to_owned()]),
            author: Some("camper".to_owned()),
        }];

        write_snapshot(&dir, window, date(), &pull_requests).expect("snapshot should be written");

        let raw = std::fs::read_to_string(dir.join("open-prs_7-9_2026-10-18.json"))
            .expect("snapshot should exist");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("snapshot is JSON");
        assert_eq!(
            value,
            json!([{ "number": 8, "labels": ["scope: guide"], "author": "camper" }])
        );
    }
}
