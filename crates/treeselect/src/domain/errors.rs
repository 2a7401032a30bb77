//! Domain-specific errors.

use thiserror::Error;

use crate::domain::model::RangeId;

/// Violated preconditions of the selection engine.
///
/// Every variant describes a programming or integration error: the node index and the range list
/// no longer agree with the caller's view of the tree. None of them are retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("node {node} is not selected")]
    NotSelected { node: String },
    #[error("node {node} is flagged selected but missing from the node index")]
    UnindexedNeighbor { node: String },
    #[error("node {node} is not a member of the range")]
    NotInRange { node: String },
    #[error("both neighbours of node {node} already belong to range {range}")]
    NeighborsShareRange { node: String, range: RangeId },
    #[error("range {0} is indexed but no longer exists")]
    MissingRange(RangeId),
    #[error("insert position {index} is out of bounds for a range of length {len}")]
    IndexOutOfBounds { index: isize, len: usize },
    #[error("node {target} cannot be reached from node {anchor} in row order")]
    SpanUnreachable { anchor: String, target: String },
    #[error("selection invariant violated: {0}")]
    Invariant(String),
}

impl SelectionError {
    pub(crate) fn not_selected(node: impl std::fmt::Debug) -> Self {
        Self::NotSelected {
            node: format!("{node:?}"),
        }
    }

    pub(crate) fn unindexed(node: impl std::fmt::Debug) -> Self {
        Self::UnindexedNeighbor {
            node: format!("{node:?}"),
        }
    }

    pub(crate) fn not_in_range(node: impl std::fmt::Debug) -> Self {
        Self::NotInRange {
            node: format!("{node:?}"),
        }
    }
}
