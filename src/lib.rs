//! Labelwright library crate for triaging open GitHub pull requests.
//!
//! The library resolves a window of open pull requests, walks the listing
//! with an early-exit paginator, classifies each pull request's changed
//! files into labels and advisory comments, applies only the missing labels
//! under a rate limit, and records every decision in a checkpointed
//! processing log.

pub mod config;
pub mod error;
pub mod github;
pub mod processing_log;
mod storage;
pub mod triage;

pub use config::{LabelwrightConfig, TriageTask};
pub use error::TriageError;
pub use github::{
    DryRunMutations, MutationGateway, OctocrabGateway, OctocrabMutationGateway,
    PersonalAccessToken, RepositoryLocator,
};
pub use processing_log::{FileLogSink, LogDocument, ProcessingLog};
pub use triage::{
    Gateways, LabelClassifier, PrWindow, RateLimiter, RunReport, RunRequest, RunSettings,
    TriageRunner,
};
