//! Decision values stored in processing log entries.
//!
//! Both decisions serialise to a bare JSON value: the sentinel strings
//! `"not added"` / `"none added"`, the comment text, or the label list.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const COMMENT_NOT_ADDED: &str = "not added";
const LABELS_NONE_ADDED: &str = "none added";

/// Outcome of the advisory comment step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentDecision {
    /// No comment was warranted.
    NotAdded,
    /// The given comment text was posted (or would have been, in a dry run).
    Added(String),
}

/// Outcome of the labelling step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelsDecision {
    /// Every candidate label was already present.
    NoneAdded,
    /// These labels were added.
    Added(Vec<String>),
}

impl LabelsDecision {
    /// Builds the decision for a (possibly empty) set of new labels.
    #[must_use]
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let added: Vec<String> = labels.into_iter().collect();
        if added.is_empty() {
            Self::NoneAdded
        } else {
            Self::Added(added)
        }
    }
}

impl Serialize for CommentDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotAdded => serializer.serialize_str(COMMENT_NOT_ADDED),
            Self::Added(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for CommentDecision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text == COMMENT_NOT_ADDED {
            Ok(Self::NotAdded)
        } else {
            Ok(Self::Added(text))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabels {
    Sentinel(String),
    List(Vec<String>),
}

impl Serialize for LabelsDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NoneAdded => serializer.serialize_str(LABELS_NONE_ADDED),
            Self::Added(labels) => labels.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for LabelsDecision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawLabels::deserialize(deserializer)? {
            RawLabels::Sentinel(text) if text == LABELS_NONE_ADDED => Ok(Self::NoneAdded),
            RawLabels::Sentinel(text) => Err(serde::de::Error::custom(format!(
                "expected \"{LABELS_NONE_ADDED}\" or a list of labels, got \"{text}\""
            ))),
            RawLabels::List(labels) => Ok(Self::Added(labels)),
        }
    }
}
