//! Error types shared by the triage pipeline, the GitHub gateways, and the
//! processing log.

use thiserror::Error;

/// Errors surfaced while resolving a run, talking to GitHub, or recording
/// decisions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriageError {
    /// The mode token was neither `all` nor `range`.
    #[error("please specify either `all` or `range` as the first argument (got `{mode}`)")]
    InvalidMode {
        /// The token supplied on the command line.
        mode: String,
    },

    /// The requested pull request range is unusable.
    #[error("invalid pull request range: {message}")]
    InvalidRange {
        /// Why the range was rejected.
        message: String,
    },

    /// The processing log was updated for a pull request it never registered.
    #[error("processing log has no entry for PR #{number}")]
    UnknownEntry {
        /// Pull request number passed to `update`.
        number: u64,
    },

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The repository owner or name was empty.
    #[error("repository must be given as <owner>/<repo>")]
    MissingPathSegments,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// A listing page broke the ascending pull request number contract.
    #[error("pull request listing is not sorted ascending: #{previous} was followed by #{next}")]
    UnsortedPage {
        /// Last number seen before the violation.
        previous: u64,
        /// Number that should have been greater than `previous`.
        next: u64,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The advisory comment template failed to render.
    #[error("comment template error: {message}")]
    Template {
        /// Rendering error detail.
        message: String,
    },
}

impl TriageError {
    /// Returns true when the failure came from the hosting platform rather
    /// than from local input or bookkeeping.
    #[must_use]
    pub const fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. }
                | Self::Api { .. }
                | Self::Network { .. }
                | Self::RateLimitExceeded { .. }
                | Self::UnsortedPage { .. }
        )
    }
}
