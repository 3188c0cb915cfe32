//! Minimum spacing between mutating platform calls.

use std::time::Duration;

use crate::config::TriageTask;

/// Interval used when none is configured, or when it is zero.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1500);

/// Fallback interval between close and reopen pairs.
pub const CLOSE_REOPEN_INTERVAL: Duration = Duration::from_secs(90);

/// Suspends the caller for a fixed interval after each mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    interval: Duration,
}

impl RateLimiter {
    /// Creates a limiter; `None` and `Some(0)` select [`DEFAULT_INTERVAL`].
    #[must_use]
    pub const fn from_millis(interval_ms: Option<u64>) -> Self {
        Self::with_fallback(interval_ms, DEFAULT_INTERVAL)
    }

    /// Creates a limiter; `None` and `Some(0)` select `fallback`.
    #[must_use]
    pub const fn with_fallback(interval_ms: Option<u64>, fallback: Duration) -> Self {
        let interval = match interval_ms {
            Some(millis) if millis > 0 => Duration::from_millis(millis),
            _ => fallback,
        };
        Self { interval }
    }

    /// Creates the limiter for `task`, falling back to its default interval.
    #[must_use]
    pub const fn for_task(task: TriageTask, interval_ms: Option<u64>) -> Self {
        let fallback = match task {
            TriageTask::CloseReopen => CLOSE_REOPEN_INTERVAL,
            TriageTask::LabelOpenPrs | TriageTask::LocalTestBackfill => DEFAULT_INTERVAL,
        };
        Self::with_fallback(interval_ms, fallback)
    }

    /// The enforced interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the interval.
    pub async fn throttle(&self) {
        tracing::debug!(interval_ms = self.interval.as_millis(), "throttling");
        tokio::time::sleep(self.interval).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_millis(None)
    }
}
