//! Visually contiguous runs of selected nodes.

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::domain::errors::SelectionError;
use crate::domain::path::TreePath;

/// One selected node together with its cached path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeMember<N> {
    pub node: N,
    pub path: TreePath,
}

/// Ordered run of nodes where every member is the row-order successor of the one before it.
///
/// The range does not verify contiguity itself; the selection manager only inserts at positions
/// it has established through the tree walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSelectionRange<N> {
    members: VecDeque<RangeMember<N>>,
}

impl<N: Copy + Eq + fmt::Debug> TreeSelectionRange<N> {
    /// Range holding a single node.
    pub fn singleton(node: N, path: TreePath) -> Self {
        Self {
            members: VecDeque::from([RangeMember { node, path }]),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Path of the first member.
    pub fn start(&self) -> Option<&TreePath> {
        self.members.front().map(|member| &member.path)
    }

    /// Path of the last member.
    pub fn end(&self) -> Option<&TreePath> {
        self.members.back().map(|member| &member.path)
    }

    pub fn first_node(&self) -> Option<N> {
        self.members.front().map(|member| member.node)
    }

    pub fn last_node(&self) -> Option<N> {
        self.members.back().map(|member| member.node)
    }

    pub fn contains(&self, node: N) -> bool {
        self.members.iter().any(|member| member.node == node)
    }

    /// Insert `node` at `index`. Negative indices count from the back, `-1` appends.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::IndexOutOfBounds`] when `index` resolves outside `0..=len`.
    pub fn insert(&mut self, index: isize, node: N, path: TreePath) -> Result<(), SelectionError> {
        let len = self.members.len();
        let resolved = if index < 0 {
            (len + 1).checked_sub(index.unsigned_abs())
        } else {
            Some(index.unsigned_abs()).filter(|position| *position <= len)
        };
        let position = resolved.ok_or(SelectionError::IndexOutOfBounds { index, len })?;
        self.members.insert(position, RangeMember { node, path });
        Ok(())
    }

    pub(crate) fn push_front(&mut self, node: N, path: TreePath) {
        self.members.push_front(RangeMember { node, path });
    }

    pub(crate) fn push_back(&mut self, node: N, path: TreePath) {
        self.members.push_back(RangeMember { node, path });
    }

    /// Remove `node` from the range.
    ///
    /// Removing an edge member trims the range in place. Removing an interior member truncates
    /// this range right before `node` and returns a new range with every member after it. Removing
    /// the only member leaves the range empty.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NotInRange`] when `node` is not a member; the range is unchanged.
    pub fn split(&mut self, node: N) -> Result<Option<Self>, SelectionError> {
        let position = self
            .members
            .iter()
            .position(|member| member.node == node)
            .ok_or_else(|| SelectionError::not_in_range(node))?;

        if position == 0 {
            self.members.pop_front();
            return Ok(None);
        }
        if position + 1 == self.members.len() {
            self.members.pop_back();
            return Ok(None);
        }

        let tail = self.members.split_off(position + 1);
        self.members.pop_back();
        Ok(Some(Self { members: tail }))
    }

    /// Visit members front to back until `callback` returns `Some`.
    pub fn each<R>(&self, mut callback: impl FnMut(N, &TreePath) -> Option<R>) -> Option<R> {
        self.members
            .iter()
            .find_map(|member| callback(member.node, &member.path))
    }

    /// Visit members back to front until `callback` returns `Some`.
    pub fn reverse_each<R>(
        &self,
        mut callback: impl FnMut(N, &TreePath) -> Option<R>,
    ) -> Option<R> {
        self.members
            .iter()
            .rev()
            .find_map(|member| callback(member.node, &member.path))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RangeMember<N>> + '_ {
        self.members.iter()
    }

    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = N> + '_ {
        self.members.iter().map(|member| member.node)
    }

    pub fn paths(&self) -> impl DoubleEndedIterator<Item = &TreePath> + '_ {
        self.members.iter().map(|member| &member.path)
    }

    pub(crate) fn into_members(self) -> impl Iterator<Item = RangeMember<N>> {
        self.members.into_iter()
    }

    /// Serializable description of the range bounds.
    pub fn summary(&self) -> Option<RangeSummary> {
        Some(RangeSummary {
            start: self.start()?.clone(),
            end: self.end()?.clone(),
            len: self.len(),
        })
    }
}

/// Bounds and size of one range, as reported to hosts and replay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub start: TreePath,
    pub end: TreePath,
    pub len: usize,
}

impl fmt::Display for RangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} ({})", self.start, self.end, self.len)
    }
}
