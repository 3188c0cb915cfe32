//! Restarting pull requests listed in a failure report.

use crate::error::TriageError;
use crate::github::{MutationGateway, PullRequestFilesGateway, RepositoryGateway};
use crate::processing_log::{LogDocument, LogEntry, LogSink, LogUpdate, ProcessingLog};
use crate::triage::close_reopen::CloseReopenTarget;

use super::{TriageRunner, finalise};

/// What a close and reopen run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReopenReport {
    /// Pull requests closed and reopened.
    pub restarted: usize,
    /// Pull requests left alone because their failure was unknown.
    pub skipped: usize,
    /// The final processing log.
    pub log: LogDocument,
}

#[derive(Debug, Default)]
struct Restarts {
    restarted: usize,
    skipped: usize,
}

impl<R, F, M> TriageRunner<'_, R, F, M>
where
    R: RepositoryGateway + ?Sized,
    F: PullRequestFilesGateway + ?Sized,
    M: MutationGateway + ?Sized,
{
    /// Closes and reopens every target whose failure is known, in order.
    ///
    /// Each restart is followed by a throttle. The log is finished on both
    /// the success and the failure path.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the log cannot be stored and upstream
    /// failures from the mutation gateway.
    pub async fn close_reopen<S: LogSink>(
        &self,
        targets: &[CloseReopenTarget],
        sink: S,
    ) -> Result<CloseReopenReport, TriageError> {
        sink.prepare()?;
        let mut log = ProcessingLog::start(sink);
        tracing::info!(count = targets.len(), "starting close and reopen");
        let outcome = self.restart_all(targets, &mut log).await;
        let (restarts, document) = finalise(log, outcome)?;
        tracing::info!(
            restarted = restarts.restarted,
            skipped = restarts.skipped,
            "closing and reopening complete"
        );
        Ok(CloseReopenReport {
            restarted: restarts.restarted,
            skipped: restarts.skipped,
            log: document,
        })
    }

    async fn restart_all<S: LogSink>(
        &self,
        targets: &[CloseReopenTarget],
        log: &mut ProcessingLog<S>,
    ) -> Result<Restarts, TriageError> {
        let mut restarts = Restarts::default();
        for (index, target) in targets.iter().enumerate() {
            let number = target.number;
            log.add(
                number,
                LogEntry::for_failure(target.error_description.as_str()),
            );
            if target.needs_restart() {
                self.gateways
                    .mutations
                    .close_reopen(self.locator, number)
                    .await?;
                self.limiter.throttle().await;
                log.update(number, LogUpdate::ClosedReopened(true))?;
                restarts.restarted = restarts.restarted.saturating_add(1);
            } else {
                tracing::debug!(pr = number, "unknown failure, leaving open");
                log.update(number, LogUpdate::ClosedReopened(false))?;
                restarts.skipped = restarts.skipped.saturating_add(1);
            }

            if self.is_checkpoint(index) {
                log.export()?;
            }
        }
        Ok(restarts)
    }
}
