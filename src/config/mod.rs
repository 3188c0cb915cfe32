//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.labelwright.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `LABELWRIGHT_*`, plus the legacy
//!    `GITHUB_TOKEN`, `PRODUCTION_RUN` and `RATELIMIT_INTERVAL`
//! 4. **Command-line arguments** – `--token`/`-t`, `--owner`/`-o` and friends
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! owner = "freeCodeCamp"
//! repo = "freeCodeCamp"
//! base_branch = "master"
//! production_run = false
//! rate_limit_interval_ms = 1500
//! log_dir = "work-logs"
//! snapshot_dir = "data"
//! task = "label-open-prs"
//! input_file = "failures.json"
//! ```

use std::env;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::TriageError;
use crate::github::RepositoryLocator;

const DEFAULT_OWNER: &str = "freeCodeCamp";
const DEFAULT_REPO: &str = "freeCodeCamp";
const DEFAULT_GITHUB_URL: &str = "https://github.com";
const DEFAULT_BASE_BRANCH: &str = "master";
const DEFAULT_PER_PAGE: u8 = 100;
const DEFAULT_CHECKPOINT_INTERVAL: usize = 25;
const DEFAULT_LOG_DIR: &str = "work-logs";

/// Which triage job a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriageTask {
    /// Classify changed files and apply the missing labels and comments.
    #[default]
    LabelOpenPrs,
    /// Add `status: need to test locally` to open curriculum pull requests.
    LocalTestBackfill,
    /// Close and reopen the pull requests listed in a failure report.
    CloseReopen,
}

impl TriageTask {
    /// Name used in the processing log file name.
    #[must_use]
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::LabelOpenPrs => "open-prs-processed",
            Self::LocalTestBackfill => "all-locally-tested-labels",
            Self::CloseReopen => "prs-closed-reopened",
        }
    }

    /// True when the task classifies each pull request's changed files.
    #[must_use]
    pub const fn reads_changed_files(self) -> bool {
        matches!(self, Self::LabelOpenPrs)
    }
}

impl FromStr for TriageTask {
    type Err = TriageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "label-open-prs" => Ok(Self::LabelOpenPrs),
            "local-test-backfill" => Ok(Self::LocalTestBackfill),
            "close-reopen" => Ok(Self::CloseReopen),
            other => Err(TriageError::Configuration {
                message: format!(
                    "unknown task `{other}` (expected `label-open-prs`, `local-test-backfill` \
                     or `close-reopen`)"
                ),
            }),
        }
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use labelwright::LabelwrightConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = LabelwrightConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "LABELWRIGHT",
    discovery(
        dotfile_name = ".labelwright.toml",
        config_file_name = "labelwright.toml",
        app_name = "labelwright"
    )
)]
pub struct LabelwrightConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `LABELWRIGHT_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repository owner. Defaults to `freeCodeCamp`.
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name. Defaults to `freeCodeCamp`.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Web URL of the GitHub host. Defaults to `https://github.com`;
    /// Enterprise hosts are reached through `<host>/api/v3`.
    #[ortho_config(cli_short = 'g')]
    pub github_url: Option<String>,

    /// Only pull requests targeting this branch are triaged. Defaults to
    /// `master`.
    #[ortho_config(cli_short = 'b')]
    pub base_branch: Option<String>,

    /// Page size for the pull request listing, 1 to 100. Defaults to 100.
    #[ortho_config(cli_short = 'n')]
    pub per_page: Option<u8>,

    /// Applies labels and comments instead of only logging them.
    ///
    /// Can be provided via:
    /// - CLI: `--production-run` / `-p`
    /// - Environment: `PRODUCTION_RUN=true` (legacy)
    /// - Config file: `production_run = true`
    ///
    /// `ortho_config` does not load boolean values from the environment, so
    /// the legacy variable is read by [`Self::is_production_run`].
    #[ortho_config(cli_short = 'p')]
    pub production_run: bool,

    /// Minimum delay after each mutating call, in milliseconds.
    ///
    /// Zero or unset means 1500, or 90 seconds for `close-reopen`. Falls
    /// back to the legacy `RATELIMIT_INTERVAL` environment variable.
    #[ortho_config(cli_short = 'i')]
    pub rate_limit_interval_ms: Option<u64>,

    /// Export the processing log every this many pull requests. Defaults to
    /// 25.
    #[ortho_config(cli_short = 'c')]
    pub checkpoint_interval: Option<usize>,

    /// Directory for processing logs. Defaults to `work-logs`.
    #[ortho_config(cli_short = 'l')]
    pub log_dir: Option<Utf8PathBuf>,

    /// Directory for the retrieved pull request snapshot; no snapshot is
    /// written when unset.
    #[ortho_config(cli_short = 's')]
    pub snapshot_dir: Option<Utf8PathBuf>,

    /// `label-open-prs` (default), `local-test-backfill` or `close-reopen`.
    #[ortho_config(cli_short = 'k')]
    pub task: Option<String>,

    /// Failure report read by the `close-reopen` task.
    #[ortho_config(cli_short = 'f')]
    pub input_file: Option<Utf8PathBuf>,
}

impl LabelwrightConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, TriageError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or(TriageError::MissingToken)
    }

    /// Builds the locator for the configured repository and host.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidUrl`] or
    /// [`TriageError::MissingPathSegments`] for an unusable host, owner or
    /// repository.
    pub fn repository_locator(&self) -> Result<RepositoryLocator, TriageError> {
        RepositoryLocator::on_host(
            self.github_url.as_deref().unwrap_or(DEFAULT_GITHUB_URL),
            self.owner.as_deref().unwrap_or(DEFAULT_OWNER),
            self.repo.as_deref().unwrap_or(DEFAULT_REPO),
        )
    }

    /// Base branch filter for the listing.
    #[must_use]
    pub fn base_branch(&self) -> &str {
        self.base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    }

    /// Listing page size.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] when outside 1 to 100.
    pub fn per_page(&self) -> Result<u8, TriageError> {
        match self.per_page {
            None => Ok(DEFAULT_PER_PAGE),
            Some(value @ 1..=100) => Ok(value),
            Some(value) => Err(TriageError::Configuration {
                message: format!("per_page must be between 1 and 100, got {value}"),
            }),
        }
    }

    /// True when writes should reach GitHub.
    #[must_use]
    pub fn is_production_run(&self) -> bool {
        self.production_run || env::var("PRODUCTION_RUN").is_ok_and(|value| value == "true")
    }

    /// `production` or `test`, used to name the processing log.
    #[must_use]
    pub fn run_kind(&self) -> &'static str {
        if self.is_production_run() {
            "production"
        } else {
            "test"
        }
    }

    /// Configured mutation interval, falling back to `RATELIMIT_INTERVAL`.
    ///
    /// Unparseable legacy values are ignored.
    #[must_use]
    pub fn rate_limit_interval_ms(&self) -> Option<u64> {
        self.rate_limit_interval_ms.or_else(|| {
            env::var("RATELIMIT_INTERVAL")
                .ok()
                .and_then(|value| value.trim().parse().ok())
        })
    }

    /// Checkpoint cadence; zero is treated as the default.
    #[must_use]
    pub fn checkpoint_interval(&self) -> usize {
        self.checkpoint_interval
            .filter(|interval| *interval > 0)
            .unwrap_or(DEFAULT_CHECKPOINT_INTERVAL)
    }

    /// Directory the processing log is written to.
    #[must_use]
    pub fn log_dir(&self) -> Utf8PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_LOG_DIR))
    }

    /// Failure report for the `close-reopen` task.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] when no file was given.
    pub fn input_file(&self) -> Result<&Utf8Path, TriageError> {
        self.input_file
            .as_deref()
            .ok_or_else(|| TriageError::Configuration {
                message: "specify the failure report to close and reopen with --input-file"
                    .to_owned(),
            })
    }

    /// The task to run.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] for an unknown task name.
    pub fn task(&self) -> Result<TriageTask, TriageError> {
        self.task
            .as_deref()
            .map_or(Ok(TriageTask::LabelOpenPrs), str::parse)
    }
}
