use serde::{Deserialize, Serialize};
use std::fmt;

/// How a project board is located within an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLocator {
    Number(u64),
    Title(String),
}

impl fmt::Display for ProjectLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectLocator::Number(n) => write!(f, "#{}", n),
            ProjectLocator::Title(t) => write!(f, "{:?}", t),
        }
    }
}

/// One selectable option of a board's single-select Status field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOption {
    pub id: String,
    pub label: String,
}

/// The single-select Status field of a board.
///
/// Option labels are unique within a field; lookup is exact-match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusField {
    pub id: String,
    pub options: Vec<StatusOption>,
}

/// A resolved GitHub Projects (v2) board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub status_field: StatusField,
}

/// The result of attaching a content object to a board.
///
/// The item id is distinct from the content object's id. The status label is
/// absent until someone (human or this tool) sets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItem {
    pub id: String,
    pub status: Option<String>,
}

impl BoardItem {
    /// True when the Status field has never been set (or was cleared).
    pub fn status_is_unset(&self) -> bool {
        self.status.as_deref().is_none_or(str::is_empty)
    }
}

/// A discovered issue or pull request, identified by its global content id.
///
/// Number and title are carried for progress reporting only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    pub id: String,
    pub number: u64,
    pub title: String,
}

/// Discovery category, mapping to the target status label for newly-added
/// items. More buckets can be added without touching the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageBucket {
    PrimaryOrg,
    Subproject,
}

impl fmt::Display for TriageBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriageBucket::PrimaryOrg => write!(f, "primary-org"),
            TriageBucket::Subproject => write!(f, "subproject"),
        }
    }
}

/// Aggregated counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub repos: usize,
    pub items: usize,
    pub written: usize,
    pub already_set: usize,
    pub planned: usize,
}
