//! Repository identity wrappers and API route construction.

use url::Url;

use crate::error::TriageError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, TriageError> {
        if value.is_empty() {
            return Err(TriageError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, TriageError> {
        if value.is_empty() {
            return Err(TriageError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, TriageError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TriageError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Derives the GitHub API base URL from a web URL.
///
/// `github.com` maps to the public API host; any other host is treated as
/// GitHub Enterprise and served from `/api/v3`.
fn derive_api_base(parsed: &Url) -> Result<Url, TriageError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| TriageError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") {
        return Url::parse("https://api.github.com")
            .map_err(|error| TriageError::InvalidUrl(error.to_string()));
    }

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = Url::parse(&format!("{}://{authority}", parsed.scheme()))
        .map_err(|error| TriageError::InvalidUrl(error.to_string()))?;
    api_url
        .set_port(parsed.port())
        .map_err(|()| TriageError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

/// Repository being triaged, with its derived API base.
///
/// # Example
///
/// ```
/// use labelwright::github::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("https://github.com/freeCodeCamp/freeCodeCamp")
///     .expect("should parse repository URL");
/// assert_eq!(locator.owner().as_str(), "freeCodeCamp");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a locator for `github.com` from owner and repository names.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::MissingPathSegments` when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, TriageError> {
        Self::on_host("https://github.com", owner, repo)
    }

    /// Creates a locator for `owner/repo` on the given web host, e.g.
    /// `https://github.com` or a GitHub Enterprise URL.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidUrl` when the host URL cannot be parsed
    /// and `MissingPathSegments` when owner or repo is empty.
    pub fn on_host(web_base: &str, owner: &str, repo: &str) -> Result<Self, TriageError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let repository = RepositoryName::new(repo)?;
        let parsed =
            Url::parse(web_base).map_err(|error| TriageError::InvalidUrl(error.to_string()))?;
        let api_base = derive_api_base(&parsed)?;

        Ok(Self {
            api_base,
            owner: validated_owner,
            repository,
        })
    }

    /// Parses a repository URL in the form `https://<host>/<owner>/<repo>`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidUrl` when parsing fails or
    /// `MissingPathSegments` when the URL path is not `/owner/repo`.
    pub fn parse(input: &str) -> Result<Self, TriageError> {
        let parsed =
            Url::parse(input).map_err(|error| TriageError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(TriageError::MissingPathSegments)?;
        let owner_segment = segments.next().ok_or(TriageError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(TriageError::MissingPathSegments)?;

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;
        let api_base = derive_api_base(&parsed)?;

        Ok(Self {
            api_base,
            owner,
            repository,
        })
    }

    /// API base URL derived from the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repo_path())
    }

    pub(crate) fn pull_path(&self, number: u64) -> String {
        format!("{}/pulls/{number}", self.repo_path())
    }

    pub(crate) fn pull_files_path(&self, number: u64) -> String {
        format!("{}/pulls/{number}/files", self.repo_path())
    }

    pub(crate) fn issue_labels_path(&self, number: u64) -> String {
        format!("{}/issues/{number}/labels", self.repo_path())
    }

    pub(crate) fn issue_comments_path(&self, number: u64) -> String {
        format!("{}/issues/{number}/comments", self.repo_path())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PersonalAccessToken, RepositoryLocator};
    use crate::error::TriageError;

    #[rstest]
    fn github_com_uses_public_api_host() {
        let locator = RepositoryLocator::from_owner_repo("octo", "repo")
            .expect("should create repository locator");
        assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
        assert_eq!(locator.pulls_path(), "/repos/octo/repo/pulls");
    }

    #[rstest]
    fn enterprise_host_serves_api_under_v3() {
        let locator = RepositoryLocator::on_host("https://ghe.example.com", "foo", "bar")
            .expect("should create enterprise locator");
        assert_eq!(
            locator.api_base().as_str(),
            "https://ghe.example.com/api/v3",
            "enterprise api base mismatch"
        );
    }

    #[rstest]
    fn builds_issue_routes_for_mutations() {
        let locator = RepositoryLocator::from_owner_repo("octo", "repo")
            .expect("should create repository locator");
        assert_eq!(locator.issue_labels_path(7), "/repos/octo/repo/issues/7/labels");
        assert_eq!(
            locator.issue_comments_path(7),
            "/repos/octo/repo/issues/7/comments"
        );
        assert_eq!(locator.pull_files_path(7), "/repos/octo/repo/pulls/7/files");
    }

    #[rstest]
    #[case::empty_owner("", "repo")]
    #[case::empty_repo("octo", "")]
    fn rejects_empty_segments(#[case] owner: &str, #[case] repo: &str) {
        let result = RepositoryLocator::from_owner_repo(owner, repo);
        assert!(
            matches!(result, Err(TriageError::MissingPathSegments)),
            "expected MissingPathSegments, got {result:?}"
        );
    }

    #[rstest]
    fn blank_token_is_rejected() {
        let result = PersonalAccessToken::new("   ");
        assert_eq!(result, Err(TriageError::MissingToken));
    }
}
