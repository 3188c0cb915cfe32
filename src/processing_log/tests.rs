//! Unit tests for the processing log and its file sink.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::{
    CommentDecision, FileLogSink, LabelsDecision, LogDocument, LogEntry, LogSink, LogUpdate,
    ProcessingLog,
};
use crate::error::TriageError;

/// Keeps every exported document in memory.
#[derive(Default)]
struct RecordingSink {
    exports: RefCell<Vec<LogDocument>>,
}

impl RecordingSink {
    fn last(&self) -> LogDocument {
        self.exports
            .borrow()
            .last()
            .cloned()
            .expect("at least one export should have happened")
    }

    fn count(&self) -> usize {
        self.exports.borrow().len()
    }
}

impl LogSink for RecordingSink {
    fn write(&self, document: &LogDocument) -> Result<(), TriageError> {
        self.exports.borrow_mut().push(document.clone());
        Ok(())
    }
}

struct FailingSink;

impl LogSink for FailingSink {
    fn write(&self, _document: &LogDocument) -> Result<(), TriageError> {
        Err(TriageError::Io {
            message: "disk full".to_owned(),
        })
    }
}

#[fixture]
fn sink() -> RecordingSink {
    RecordingSink::default()
}

fn exported_json(document: &LogDocument) -> serde_json::Value {
    serde_json::to_value(document).expect("document should serialise")
}

#[rstest]
fn export_before_update_shows_null_fields(sink: RecordingSink) {
    let mut log = ProcessingLog::start(&sink);
    log.add(42, LogEntry::default());

    log.export().expect("export should succeed");

    let value = exported_json(&sink.last());
    assert_eq!(
        value.get("prs"),
        Some(&json!([{ "42": { "comment": null, "labels": null } }]))
    );
    assert_eq!(value.get("finish"), Some(&json!(null)));
}

#[rstest]
fn update_is_reflected_in_next_export(sink: RecordingSink) {
    let mut log = ProcessingLog::start(&sink);
    log.add(42, LogEntry::default());
    log.update(42, LogUpdate::Labels(LabelsDecision::Added(vec!["x".to_owned()])))
        .expect("update should succeed");

    log.export().expect("export should succeed");

    let value = exported_json(&sink.last());
    assert_eq!(
        value.pointer("/prs/0/42/labels"),
        Some(&json!(["x"])),
        "labels should be exported: {value}"
    );
}

#[rstest]
fn update_without_add_is_rejected(sink: RecordingSink) {
    let mut log = ProcessingLog::start(&sink);
    log.add(42, LogEntry::default());

    let result = log.update(99, LogUpdate::Comment(CommentDecision::NotAdded));

    assert_eq!(result, Err(TriageError::UnknownEntry { number: 99 }));
}

#[rstest]
fn export_sorts_numerically_not_by_insertion(sink: RecordingSink) {
    let mut log = ProcessingLog::start(&sink);
    for number in [5, 3, 9, 10] {
        log.add(number, LogEntry::default());
    }

    log.export().expect("export should succeed");

    let numbers: Vec<u64> = sink.last().entries().map(|(number, _)| number).collect();
    assert_eq!(numbers, vec![3, 5, 9, 10]);
}

#[rstest]
fn re_adding_replaces_the_entry(sink: RecordingSink) {
    let mut log = ProcessingLog::start(&sink);
    log.add(7, LogEntry::default());
    log.update(7, LogUpdate::Comment(CommentDecision::NotAdded))
        .expect("update should succeed");

    log.add(7, LogEntry::default());

    assert_eq!(log.len(), 1);
    assert_eq!(log.entry(7).and_then(|entry| entry.comment.clone()), None);
}

#[rstest]
fn finish_stamps_and_exports_once_more(sink: RecordingSink) {
    let start = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).single().expect("valid time");
    let finish = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).single().expect("valid time");
    let mut log = ProcessingLog::started_at(&sink, start);
    log.add(1, LogEntry::default());
    log.export().expect("checkpoint should succeed");

    let document = log.finish_at(finish).expect("finish should succeed");

    assert_eq!(sink.count(), 2, "checkpoint plus final export");
    assert_eq!(document.start, start);
    assert_eq!(document.finish, Some(finish));
    assert_eq!(sink.last(), document);
}

#[rstest]
fn sink_failures_propagate() {
    let log = ProcessingLog::start(FailingSink);

    let result = log.finish();

    assert!(
        matches!(result, Err(TriageError::Io { .. })),
        "expected Io error, got {result:?}"
    );
}

#[rstest]
fn file_sink_round_trips_through_import() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let dir = Utf8PathBuf::from_path_buf(temp_dir.path().join("work-logs"))
        .expect("temp path should be UTF-8");
    let sink = FileLogSink::for_run(&dir, "test", "open-prs-processed");
    assert!(sink.path().as_str().ends_with("work-logs/test_open-prs-processed.json"));

    let mut log = ProcessingLog::start(sink.clone());
    log.add(12, LogEntry::default());
    log.update(12, LogUpdate::Comment(CommentDecision::NotAdded))
        .expect("update should succeed");
    log.update(12, LogUpdate::Labels(LabelsDecision::NoneAdded))
        .expect("update should succeed");
    let written = log.finish().expect("finish should write the file");

    let imported = ProcessingLog::<FileLogSink>::import(&sink).expect("import should read the file");

    assert_eq!(imported, written);
    let raw = std::fs::read_to_string(sink.path()).expect("log file should exist");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("log should be JSON");
    assert_eq!(
        value.pointer("/prs/0/12"),
        Some(&json!({ "comment": "not added", "labels": "none added" }))
    );
}

#[rstest]
fn add_keeps_initial_fields(sink: RecordingSink) {
    let mut log = ProcessingLog::start(&sink);
    log.add(4, LogEntry::for_failure("merge conflict"));
    log.update(4, LogUpdate::ClosedReopened(true))
        .expect("update should succeed");

    log.export().expect("export should succeed");

    let value = exported_json(&sink.last());
    assert_eq!(
        value.pointer("/prs/0/4"),
        Some(&json!({
            "comment": null,
            "labels": null,
            "closedOpened": true,
            "errorDesc": "merge conflict"
        }))
    );
}

#[rstest]
fn file_sink_prepares_parent_relative_directory() {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
        .expect("temp path should be UTF-8");
    let sink = FileLogSink::for_run(&root.join("scripts/../work-logs"), "test", "x");

    sink.prepare().expect("directory should be prepared");
    ProcessingLog::start(&sink)
        .finish()
        .expect("finish should write the file");

    assert!(root.join("work-logs/test_x.json").exists());
}
