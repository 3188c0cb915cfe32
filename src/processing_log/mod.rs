//! Per-run record of the triage decisions taken for each pull request.
//!
//! A [`ProcessingLog`] is created when a run starts, gains an entry as each
//! pull request begins processing, and is exported to its [`LogSink`] both
//! periodically and when the run finishes. Exports always list entries in
//! ascending pull request order, so a crashed run leaves a readable,
//! timestamped record of every pull request it started examining.
//!
//! The exported document looks like:
//!
//! ```json
//! {
//!   "start": "2026-10-18T09:00:00Z",
//!   "finish": null,
//!   "prs": [
//!     { "3": { "comment": "not added", "labels": "none added" } },
//!     { "5": { "comment": "not added", "labels": ["scope: guide"] } }
//!   ]
//! }
//! ```

mod decision;
mod sink;

pub use decision::{CommentDecision, LabelsDecision};
pub use sink::{FileLogSink, LogSink};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// Decisions recorded for one pull request.
///
/// Fields stay `None` until the runner reaches the corresponding step. The
/// close and reopen fields are only written by that task and are left out
/// of the JSON otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Whether an advisory comment was posted, and its text if so.
    pub comment: Option<CommentDecision>,
    /// Which labels were added.
    pub labels: Option<LabelsDecision>,
    /// Whether the pull request was closed and reopened.
    #[serde(
        rename = "closedOpened",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub closed_reopened: Option<bool>,
    /// Failure description that selected the pull request for a restart.
    #[serde(rename = "errorDesc", default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl LogEntry {
    /// Entry for a close and reopen candidate, before any action is taken.
    #[must_use]
    pub fn for_failure(error_description: impl Into<String>) -> Self {
        Self {
            error_description: Some(error_description.into()),
            ..Self::default()
        }
    }
}

/// A single-field change to a [`LogEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogUpdate {
    /// Replace the comment decision.
    Comment(CommentDecision),
    /// Replace the labels decision.
    Labels(LabelsDecision),
    /// Record whether the pull request was closed and reopened.
    ClosedReopened(bool),
}

/// Serialised form of a processing log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDocument {
    /// When the run started.
    pub start: DateTime<Utc>,
    /// When the run finished, or `None` for a checkpoint.
    pub finish: Option<DateTime<Utc>>,
    /// One single-key map per pull request, ascending by number.
    pub prs: Vec<BTreeMap<u64, LogEntry>>,
}

impl LogDocument {
    /// Iterates `(number, entry)` pairs in document order.
    pub fn entries(&self) -> impl Iterator<Item = (u64, &LogEntry)> {
        self.prs
            .iter()
            .flat_map(|record| record.iter().map(|(number, entry)| (*number, entry)))
    }
}

/// Append-only decision log for one run.
#[derive(Debug)]
pub struct ProcessingLog<S> {
    sink: S,
    start: DateTime<Utc>,
    finish: Option<DateTime<Utc>>,
    entries: BTreeMap<u64, LogEntry>,
}

impl<S: LogSink> ProcessingLog<S> {
    /// Starts a run, recording the current time as its start timestamp.
    ///
    /// This is the only constructor, so every log has a start time before
    /// any entry can be added.
    #[must_use]
    pub fn start(sink: S) -> Self {
        Self::started_at(sink, Utc::now())
    }

    /// Starts a run with an explicit start timestamp.
    #[must_use]
    pub const fn started_at(sink: S, start: DateTime<Utc>) -> Self {
        Self {
            sink,
            start,
            finish: None,
            entries: BTreeMap::new(),
        }
    }

    /// Registers a pull request with its initial fields, usually
    /// [`LogEntry::default`].
    ///
    /// Registering the same number twice replaces the earlier entry.
    pub fn add(&mut self, number: u64, initial: LogEntry) {
        self.entries.insert(number, initial);
    }

    /// Records a decision for a registered pull request.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::UnknownEntry`] when `number` was never added.
    pub fn update(&mut self, number: u64, update: LogUpdate) -> Result<(), TriageError> {
        let entry = self
            .entries
            .get_mut(&number)
            .ok_or(TriageError::UnknownEntry { number })?;
        match update {
            LogUpdate::Comment(decision) => entry.comment = Some(decision),
            LogUpdate::Labels(decision) => entry.labels = Some(decision),
            LogUpdate::ClosedReopened(done) => entry.closed_reopened = Some(done),
        }
        Ok(())
    }

    /// Returns the entry for `number`, if registered.
    #[must_use]
    pub fn entry(&self, number: u64) -> Option<&LogEntry> {
        self.entries.get(&number)
    }

    /// Number of registered pull requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no pull request has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the serialisable document for the current state.
    #[must_use]
    pub fn document(&self) -> LogDocument {
        LogDocument {
            start: self.start,
            finish: self.finish,
            prs: self
                .entries
                .iter()
                .map(|(number, entry)| BTreeMap::from([(*number, entry.clone())]))
                .collect(),
        }
    }

    /// Writes the current state to the sink, replacing any earlier export.
    ///
    /// # Errors
    ///
    /// Propagates sink failures as [`TriageError::Io`].
    pub fn export(&self) -> Result<(), TriageError> {
        self.sink.write(&self.document())?;
        tracing::debug!(entries = self.entries.len(), "processing log exported");
        Ok(())
    }

    /// Records the finish timestamp and performs the final export.
    ///
    /// Consumes the log, so a run can only be finished once.
    ///
    /// # Errors
    ///
    /// Propagates sink failures as [`TriageError::Io`].
    pub fn finish(self) -> Result<LogDocument, TriageError> {
        self.finish_at(Utc::now())
    }

    /// Finishes the run with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Propagates sink failures as [`TriageError::Io`].
    pub fn finish_at(mut self, finish: DateTime<Utc>) -> Result<LogDocument, TriageError> {
        self.finish = Some(finish);
        self.export()?;
        Ok(self.document())
    }
}

impl ProcessingLog<FileLogSink> {
    /// Reads the document a previous run exported to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Io`] when the file is missing or malformed.
    pub fn import(sink: &FileLogSink) -> Result<LogDocument, TriageError> {
        sink.read()
    }
}

#[cfg(test)]
mod tests;
