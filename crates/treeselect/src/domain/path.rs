//! Tree paths and the row-order comparator.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sibling indices locating a node from the root. The empty path is the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(Vec<usize>);

impl TreePath {
    /// Path of the root node.
    pub fn root() -> Self {
        Self::default()
    }

    /// Borrow the raw sibling indices.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path of the `index`-th child of this path.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &TreePath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl From<Vec<usize>> for TreePath {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

impl From<&[usize]> for TreePath {
    fn from(value: &[usize]) -> Self {
        Self(value.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for TreePath {
    fn from(value: [usize; N]) -> Self {
        Self(value.to_vec())
    }
}

impl Ord for TreePath {
    fn cmp(&self, other: &Self) -> Ordering {
        row_order(&self.0, &other.0)
    }
}

impl PartialOrd for TreePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (position, index) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("]")
    }
}

/// Compare two paths by their top-to-bottom position in a fully expanded tree.
///
/// The first differing sibling index decides. When one path is a prefix of the other the shorter
/// one (the ancestor) comes first. Paths of different length that are not prefixes of each other
/// are still decided element-wise.
pub fn row_order(lhs: &[usize], rhs: &[usize]) -> Ordering {
    for (left, right) in lhs.iter().zip(rhs) {
        match left.cmp(right) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }
    lhs.len().cmp(&rhs.len())
}
