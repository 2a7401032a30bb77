//! Domain models: the tree capability consumed by the selection engine and range identifiers.

use std::fmt;
use std::hash::Hash;

use crate::domain::path::TreePath;

/// Navigation and selection-flag access for a tree the selection engine works on.
///
/// Nodes are referred to through cheap `Copy` handles owned by the implementor. The engine never
/// creates or destroys nodes, it only reads the structure and toggles the selected flag.
pub trait TreeModel {
    /// Handle identifying one node of the tree.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// Sibling indices from the root down to `node`.
    fn path(&self, node: Self::Node) -> TreePath;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn child_count(&self, node: Self::Node) -> usize;

    fn child(&self, node: Self::Node, index: usize) -> Option<Self::Node>;

    fn first_child(&self, node: Self::Node) -> Option<Self::Node> {
        self.child(node, 0)
    }

    fn last_child(&self, node: Self::Node) -> Option<Self::Node> {
        let count = self.child_count(node);
        count.checked_sub(1).and_then(|last| self.child(node, last))
    }

    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node> {
        let index = *self.path(node).as_slice().last()?;
        let parent = self.parent(node)?;
        index.checked_sub(1).and_then(|prev| self.child(parent, prev))
    }

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node> {
        let index = *self.path(node).as_slice().last()?;
        let parent = self.parent(node)?;
        self.child(parent, index + 1)
    }

    /// Visual selected flag as last written by the selection engine (or the host).
    fn is_selected(&self, node: Self::Node) -> bool;

    fn set_selected(&mut self, node: Self::Node, selected: bool);
}

/// Stable identifier of a range inside one selection manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RangeId(pub(crate) u64);

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
