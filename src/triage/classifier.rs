//! Maps the files a pull request changes to the labels it should carry.

use std::collections::BTreeSet;

use regex::Regex;

use crate::error::TriageError;
use crate::github::FileChange;

use super::comment::render_guide_advisory;
use super::guide_checks::check_guide_files;

/// Label for pull requests touching contributor documentation.
pub const SCOPE_DOCUMENTATION: &str = "scope: documentation";
/// Label for pull requests touching curriculum challenges.
pub const SCOPE_CURRICULUM: &str = "scope: curriculum";
/// Label for pull requests touching guide articles.
pub const SCOPE_GUIDE: &str = "scope: guide";
/// Added alongside [`SCOPE_CURRICULUM`] so reviewers test the change locally.
pub const STATUS_NEED_TO_TEST_LOCALLY: &str = "status: need to test locally";
/// Added when the guide checks fail.
pub const STATUS_NEEDS_UPDATE: &str = "status: needs update";

const CHALLENGES_PREFIX: &str = "curriculum/challenges/";
const CURRICULUM_PREFIX: &str = "curriculum/";
const ARTICLE_PATTERN: &str =
    r"^(docs|curriculum|guide)/(arabic|chinese|portuguese|russian|spanish)?/?";

/// Article-type and language tokens with their canonical labels.
const LABEL_TABLE: [(&str, &str); 8] = [
    ("docs", SCOPE_DOCUMENTATION),
    ("curriculum", SCOPE_CURRICULUM),
    ("guide", SCOPE_GUIDE),
    ("arabic", "language: arabic"),
    ("chinese", "language: chinese"),
    ("portuguese", "language: portuguese"),
    ("russian", "language: russian"),
    ("spanish", "language: spanish"),
];

fn label_for(token: &str) -> Option<&'static str> {
    LABEL_TABLE
        .iter()
        .find(|(known, _)| *known == token)
        .map(|(_, label)| *label)
}

/// What the classifier decided for one pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Labels the pull request should carry.
    pub candidate_labels: BTreeSet<String>,
    /// Comment to post when guide checks failed.
    pub advisory_comment: Option<String>,
}

/// Path-rule classifier.
#[derive(Debug, Clone)]
pub struct LabelClassifier {
    pattern: Regex,
}

impl LabelClassifier {
    /// Compiles the path rules.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Configuration`] if the path pattern fails to
    /// compile.
    pub fn new() -> Result<Self, TriageError> {
        let pattern = Regex::new(ARTICLE_PATTERN).map_err(|error| TriageError::Configuration {
            message: format!("invalid article path pattern: {error}"),
        })?;
        Ok(Self { pattern })
    }

    /// Classifies a pull request from its changed files.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Template`] if the advisory comment cannot be
    /// rendered.
    pub fn classify(
        &self,
        files: &[FileChange],
        author: Option<&str>,
    ) -> Result<Classification, TriageError> {
        let mut candidate_labels: BTreeSet<String> = files
            .iter()
            .flat_map(|file| self.labels_for_path(&file.path))
            .map(str::to_owned)
            .collect();

        let findings = check_guide_files(files);
        let advisory_comment = if findings.is_empty() {
            None
        } else {
            candidate_labels.insert(STATUS_NEEDS_UPDATE.to_owned());
            Some(render_guide_advisory(author, &findings)?)
        };

        Ok(Classification {
            candidate_labels,
            advisory_comment,
        })
    }

    fn labels_for_path(&self, path: &str) -> Vec<&'static str> {
        let normalised = path.strip_prefix(CHALLENGES_PREFIX).map_or_else(
            || path.to_owned(),
            |rest| format!("{CURRICULUM_PREFIX}{rest}"),
        );
        let Some(captures) = self.pattern.captures(&normalised) else {
            return Vec::new();
        };

        let mut labels = Vec::new();
        let article_type = captures.get(1).map(|matched| matched.as_str());
        if let Some(label) = article_type.and_then(label_for) {
            labels.push(label);
        }
        if let Some(label) = captures
            .get(2)
            .and_then(|matched| label_for(matched.as_str()))
        {
            labels.push(label);
        }
        if article_type == Some("curriculum") {
            labels.push(STATUS_NEED_TO_TEST_LOCALLY);
        }
        labels
    }
}

/// Candidate labels for the local-test backfill: curriculum pull requests
/// should also carry [`STATUS_NEED_TO_TEST_LOCALLY`].
#[must_use]
pub fn local_test_backfill_candidates(existing: &BTreeSet<String>) -> BTreeSet<String> {
    if existing.contains(SCOPE_CURRICULUM) {
        BTreeSet::from([STATUS_NEED_TO_TEST_LOCALLY.to_owned()])
    } else {
        BTreeSet::new()
    }
}
