//! Destinations for processing log exports.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::TriageError;
use crate::storage::{open_or_create_dir, write_json};

use super::LogDocument;

/// Somewhere a [`LogDocument`] can be written, replacing the previous copy.
pub trait LogSink {
    /// Persists the document.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Io`] when the document cannot be stored.
    fn write(&self, document: &LogDocument) -> Result<(), TriageError>;

    /// Checks the destination can be written before a run mutates anything.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Io`] when the destination is unusable.
    fn prepare(&self) -> Result<(), TriageError> {
        Ok(())
    }
}

/// Writes the log as pretty-printed JSON to `<dir>/<file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSink {
    dir: Utf8PathBuf,
    file_name: String,
}

impl FileLogSink {
    /// Creates a sink for `<dir>/<file_name>`; nothing is touched until the
    /// sink is prepared or first written.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Creates the sink for a run kind and task, e.g.
    /// `work-logs/production_open-prs-processed.json`.
    #[must_use]
    pub fn for_run(dir: &Utf8Path, run_kind: &str, log_name: &str) -> Self {
        Self::new(dir, format!("{run_kind}_{log_name}.json"))
    }

    /// Full path of the log file.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.dir.join(&self.file_name)
    }

    pub(super) fn read(&self) -> Result<LogDocument, TriageError> {
        let dir = open_or_create_dir(&self.dir, "processing log")?;
        let path = self.path();
        let content = dir
            .read_to_string(&self.file_name)
            .map_err(|error| TriageError::Io {
                message: format!("failed to read processing log '{path}': {error}"),
            })?;
        serde_json::from_str(&content).map_err(|error| TriageError::Io {
            message: format!("failed to parse processing log '{path}': {error}"),
        })
    }
}

impl LogSink for FileLogSink {
    fn write(&self, document: &LogDocument) -> Result<(), TriageError> {
        let dir = open_or_create_dir(&self.dir, "processing log")?;
        write_json(&dir, &self.file_name, document)
    }

    fn prepare(&self) -> Result<(), TriageError> {
        open_or_create_dir(&self.dir, "processing log").map(drop)
    }
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn write(&self, document: &LogDocument) -> Result<(), TriageError> {
        (**self).write(document)
    }

    fn prepare(&self) -> Result<(), TriageError> {
        (**self).prepare()
    }
}
