//! Label delta computation.

use std::collections::BTreeSet;

/// Labels in `candidate` that are not already in `existing`, sorted.
#[must_use]
pub fn diff(candidate: &BTreeSet<String>, existing: &BTreeSet<String>) -> BTreeSet<String> {
    candidate.difference(existing).cloned().collect()
}

/// Labelling decision for one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDecision {
    /// Pull request number.
    pub number: u64,
    /// Labels the classifier wants on the pull request.
    pub candidate_labels: BTreeSet<String>,
    /// Labels already attached.
    pub existing_labels: BTreeSet<String>,
    /// `candidate_labels - existing_labels`.
    pub labels_to_add: BTreeSet<String>,
}

impl LabelDecision {
    /// Computes the decision for a pull request.
    #[must_use]
    pub fn new(
        number: u64,
        candidate_labels: BTreeSet<String>,
        existing_labels: BTreeSet<String>,
    ) -> Self {
        let labels_to_add = diff(&candidate_labels, &existing_labels);
        Self {
            number,
            candidate_labels,
            existing_labels,
            labels_to_add,
        }
    }

    /// Labels to add, in sorted order.
    #[must_use]
    pub fn labels_to_add(&self) -> Vec<String> {
        self.labels_to_add.iter().cloned().collect()
    }
}
