//! Octocrab client construction shared by the gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::error::TriageError;
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client authenticated with `token` and pointed at the
/// locator's API base.
///
/// # Errors
///
/// Returns `TriageError::InvalidUrl` when the base URI cannot be parsed or
/// `TriageError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    locator: &RepositoryLocator,
) -> Result<Octocrab, TriageError> {
    let base_uri: Uri = locator
        .api_base()
        .as_str()
        .parse::<Uri>()
        .map_err(|error| TriageError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| TriageError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
