//! Sequential triage run over a window of open pull requests.
//!
//! The runner owns the whole pipeline: window discovery and validation,
//! bounded retrieval, per-pull-request classification and labelling, rate
//! limiting and processing log bookkeeping. Pull requests are handled one at
//! a time; every mutating call is followed by a throttle. The close and
//! reopen task takes its pull requests from a failure report instead.

mod close_reopen;
mod snapshot;

pub use close_reopen::CloseReopenReport;
pub use snapshot::{snapshot_file_name, write_snapshot};

use camino::Utf8PathBuf;
use chrono::Utc;

use crate::config::TriageTask;
use crate::error::TriageError;
use crate::github::{
    ListPullRequestsParams, MutationGateway, PullRequestFilesGateway, PullRequestSummary,
    RepositoryGateway, RepositoryLocator,
};
use crate::processing_log::{
    CommentDecision, LabelsDecision, LogDocument, LogEntry, LogSink, LogUpdate, ProcessingLog,
};

use super::classifier::{Classification, LabelClassifier, local_test_backfill_candidates};
use super::diff::LabelDecision;
use super::paginator::{BoundedPaginator, PullRequestField};
use super::range::{PrWindow, discover_open_window, resolve, validate_request};
use super::throttle::RateLimiter;

/// Pull request selection taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    /// `all` or `range`.
    pub mode: String,
    /// First pull request number, for `range`.
    pub start: Option<String>,
    /// Last pull request number, for `range`.
    pub end: Option<String>,
}

impl RunRequest {
    /// Builds a request from positional arguments in order.
    #[must_use]
    pub fn from_positionals(positionals: &[String]) -> Self {
        let mut values = positionals.iter().cloned();
        Self {
            mode: values.next().unwrap_or_default(),
            start: values.next(),
            end: values.next(),
        }
    }
}

/// Tunables for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Which job to perform.
    pub task: TriageTask,
    /// Base branch filter for the listing.
    pub base_branch: String,
    /// Listing page size.
    pub per_page: u8,
    /// Export the log after every this many pull requests.
    pub checkpoint_interval: usize,
    /// Where to save the retrieved pull requests, if anywhere.
    pub snapshot_dir: Option<Utf8PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            task: TriageTask::LabelOpenPrs,
            base_branch: "master".to_owned(),
            per_page: 100,
            checkpoint_interval: 25,
            snapshot_dir: None,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The window processed.
    pub window: PrWindow,
    /// Number of pull requests examined.
    pub processed: usize,
    /// Pull requests that received an advisory comment.
    pub commented: usize,
    /// Pull requests that received at least one label.
    pub labelled: usize,
    /// The final processing log.
    pub log: LogDocument,
}

#[derive(Debug, Default)]
struct Tally {
    processed: usize,
    commented: usize,
    labelled: usize,
}

/// Read and write gateways a run talks to.
pub struct Gateways<'a, R: ?Sized, F: ?Sized, M: ?Sized> {
    /// Pull request listing.
    pub repository: &'a R,
    /// Changed files lookup.
    pub files: &'a F,
    /// Labels and comments, live or dry-run.
    pub mutations: &'a M,
}

/// Drives one triage run.
pub struct TriageRunner<'a, R: ?Sized, F: ?Sized, M: ?Sized> {
    gateways: Gateways<'a, R, F, M>,
    locator: &'a RepositoryLocator,
    classifier: LabelClassifier,
    limiter: RateLimiter,
    settings: RunSettings,
}

impl<'a, R, F, M> TriageRunner<'a, R, F, M>
where
    R: RepositoryGateway + ?Sized,
    F: PullRequestFilesGateway + ?Sized,
    M: MutationGateway + ?Sized,
{
    /// Creates a runner.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] if the classifier rules fail to
    /// compile.
    pub fn new(
        gateways: Gateways<'a, R, F, M>,
        locator: &'a RepositoryLocator,
        limiter: RateLimiter,
        settings: RunSettings,
    ) -> Result<Self, TriageError> {
        Ok(Self {
            gateways,
            locator,
            classifier: LabelClassifier::new()?,
            limiter,
            settings,
        })
    }

    /// Runs the configured task, writing the processing log to `sink`.
    ///
    /// Returns `None` when nothing is open in the selected window. Once the
    /// selection is valid the log is started, and it is finished on every
    /// later exit path, including discovery and retrieval failures.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidMode`] or [`TriageError::InvalidRange`]
    /// before any request is made for a bad selection, and
    /// [`TriageError::Configuration`] when the task is close-reopen. Later
    /// failures are I/O errors from the log and upstream failures.
    pub async fn run<S: LogSink>(
        &self,
        request: &RunRequest,
        sink: S,
    ) -> Result<Option<RunReport>, TriageError> {
        if self.settings.task == TriageTask::CloseReopen {
            return Err(TriageError::Configuration {
                message: "the close-reopen task reads its pull requests from --input-file"
                    .to_owned(),
            });
        }
        validate_request(&request.mode, request.start.as_deref(), request.end.as_deref())?;
        sink.prepare()?;

        let mut log = ProcessingLog::start(sink);
        let outcome = self.label_window(request, &mut log).await;
        let (labelled, document) = finalise(log, outcome)?;
        let Some((window, tally)) = labelled else {
            return Ok(None);
        };
        tracing::info!(
            processed = tally.processed,
            commented = tally.commented,
            labelled = tally.labelled,
            "labelling complete"
        );
        Ok(Some(RunReport {
            window,
            processed: tally.processed,
            commented: tally.commented,
            labelled: tally.labelled,
            log: document,
        }))
    }

    async fn label_window<S: LogSink>(
        &self,
        request: &RunRequest,
        log: &mut ProcessingLog<S>,
    ) -> Result<Option<(PrWindow, Tally)>, TriageError> {
        let base = Some(self.settings.base_branch.as_str());
        let Some(open) = discover_open_window(self.gateways.repository, self.locator, base).await?
        else {
            tracing::info!("no open pull requests, nothing to do");
            return Ok(None);
        };
        let window = resolve(
            &request.mode,
            request.start.as_deref(),
            request.end.as_deref(),
            open,
        )?;
        tracing::info!(
            first = window.first(),
            last = window.last(),
            task = self.settings.task.log_name(),
            "resolved pull request window"
        );

        let pull_requests = self.retrieve(window).await?;
        if pull_requests.is_empty() {
            tracing::info!("no open pull requests in window");
            return Ok(None);
        }
        if let Some(dir) = &self.settings.snapshot_dir {
            write_snapshot(dir, window, Utc::now().date_naive(), &pull_requests)?;
        }

        tracing::info!(count = pull_requests.len(), "starting labelling");
        let tally = self.process_all(&pull_requests, log).await?;
        Ok(Some((window, tally)))
    }

    const fn is_checkpoint(&self, index: usize) -> bool {
        matches!(index.checked_rem(self.settings.checkpoint_interval), Some(0))
    }

    async fn retrieve(&self, window: PrWindow) -> Result<Vec<PullRequestSummary>, TriageError> {
        let params = ListPullRequestsParams {
            base: Some(self.settings.base_branch.clone()),
            per_page: self.settings.per_page,
            ..ListPullRequestsParams::default()
        };
        let fields: &[PullRequestField] = if self.settings.task.reads_changed_files() {
            &[PullRequestField::Labels, PullRequestField::Author]
        } else {
            &[PullRequestField::Labels]
        };
        BoundedPaginator::new(self.gateways.repository, self.locator, params)
            .paginate(window, fields)
            .await
    }

    async fn process_all<S: LogSink>(
        &self,
        pull_requests: &[PullRequestSummary],
        log: &mut ProcessingLog<S>,
    ) -> Result<Tally, TriageError> {
        let mut tally = Tally::default();
        for (index, pull_request) in pull_requests.iter().enumerate() {
            let number = pull_request.number;
            log.add(number, LogEntry::default());
            let classification = self.classify(pull_request).await?;

            if self.settings.task == TriageTask::LabelOpenPrs
                && self
                    .post_advisory(number, classification.advisory_comment, log)
                    .await?
            {
                tally.commented = tally.commented.saturating_add(1);
            }
            let decision = LabelDecision::new(
                number,
                classification.candidate_labels,
                pull_request.labels.clone(),
            );
            if self.apply_labels(&decision, log).await? {
                tally.labelled = tally.labelled.saturating_add(1);
            }
            tally.processed = tally.processed.saturating_add(1);

            if self.is_checkpoint(index) {
                log.export()?;
            }
        }
        Ok(tally)
    }

    async fn classify(
        &self,
        pull_request: &PullRequestSummary,
    ) -> Result<Classification, TriageError> {
        if !self.settings.task.reads_changed_files() {
            return Ok(Classification {
                candidate_labels: local_test_backfill_candidates(&pull_request.labels),
                advisory_comment: None,
            });
        }
        let files = self
            .gateways
            .files
            .pull_request_files(self.locator, pull_request.number)
            .await?;
        self.classifier
            .classify(&files, pull_request.author.as_deref())
    }

    async fn post_advisory<S: LogSink>(
        &self,
        number: u64,
        advisory: Option<String>,
        log: &mut ProcessingLog<S>,
    ) -> Result<bool, TriageError> {
        let Some(comment) = advisory else {
            log.update(number, LogUpdate::Comment(CommentDecision::NotAdded))?;
            return Ok(false);
        };
        self.gateways
            .mutations
            .add_comment(self.locator, number, &comment)
            .await?;
        self.limiter.throttle().await;
        log.update(number, LogUpdate::Comment(CommentDecision::Added(comment)))?;
        Ok(true)
    }

    async fn apply_labels<S: LogSink>(
        &self,
        decision: &LabelDecision,
        log: &mut ProcessingLog<S>,
    ) -> Result<bool, TriageError> {
        let number = decision.number;
        let labels = decision.labels_to_add();
        if labels.is_empty() {
            tracing::debug!(pr = number, "no new labels");
            log.update(number, LogUpdate::Labels(LabelsDecision::NoneAdded))?;
            return Ok(false);
        }
        self.gateways
            .mutations
            .add_labels(self.locator, number, &labels)
            .await?;
        self.limiter.throttle().await;
        log.update(number, LogUpdate::Labels(LabelsDecision::from_labels(labels)))?;
        Ok(true)
    }
}

/// Finishes `log` whatever `outcome` is.
///
/// The run's own error wins over a failed final export, which is only
/// logged in that case.
fn finalise<S: LogSink, T>(
    log: ProcessingLog<S>,
    outcome: Result<T, TriageError>,
) -> Result<(T, LogDocument), TriageError> {
    let finished = log.finish();
    match outcome {
        Ok(value) => finished.map(|document| (value, document)),
        Err(error) => {
            if let Err(finish_error) = finished {
                tracing::warn!(error = %finish_error, "failed to write final processing log");
            }
            Err(error)
        }
    }
}
