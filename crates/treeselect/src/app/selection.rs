//! Tracking selected tree nodes as a minimal set of row-order ranges.
//!
//! The manager keeps two structures in lockstep: the ranges ordered by their start path, and a
//! node index mapping every selected node to the range that owns it. Adding a node probes only its
//! two row-order neighbours through the index, so a selection change never rescans the tree.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::app::events::{EventBus, SelectionEvent, SubscriptionId};
use crate::app::range::{RangeSummary, TreeSelectionRange};
use crate::app::walk;
use crate::domain::errors::SelectionError;
use crate::domain::model::{RangeId, TreeModel};
use crate::domain::path::TreePath;
use crate::infra::config::Config;

/// Behaviour switches for a [`TreeSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionOptions {
    /// Whether `select-all` requests without an explicit choice also select the root.
    pub include_root: bool,
    /// Run [`TreeSelection::validate`] after every mutation.
    pub verify_invariants: bool,
}

impl SelectionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            include_root: config.selection.include_root(),
            verify_invariants: config.selection.verify_invariants(),
        }
    }
}

/// Serializable view of the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub selected: usize,
    pub ranges: Vec<RangeSummary>,
}

enum Placement {
    Started(RangeId),
    Extended(RangeId, Vec<TreePath>),
    Joined(RangeId, Vec<TreePath>),
}

/// Selection manager for one tree view.
#[derive(Debug)]
pub struct TreeSelection<N> {
    ranges: HashMap<RangeId, TreeSelectionRange<N>>,
    order: Vec<RangeId>,
    node_index: HashMap<N, RangeId>,
    next_range: u64,
    events: EventBus,
    options: SelectionOptions,
}

impl<N: Copy + Eq + Hash + fmt::Debug> Default for TreeSelection<N> {
    fn default() -> Self {
        Self::with_options(SelectionOptions::default())
    }
}

impl<N: Copy + Eq + Hash + fmt::Debug> TreeSelection<N> {
    /// Create an empty selection with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SelectionOptions) -> Self {
        Self {
            ranges: HashMap::new(),
            order: Vec::new(),
            node_index: HashMap::new(),
            next_range: 0,
            events: EventBus::new(),
            options,
        }
    }

    pub fn options(&self) -> SelectionOptions {
        self.options
    }

    /// Register a listener for selection events.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SelectionEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Number of selected nodes.
    pub fn len(&self) -> usize {
        self.node_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_index.is_empty()
    }

    pub fn range_count(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, node: N) -> bool {
        self.node_index.contains_key(&node)
    }

    /// Ranges in row order.
    pub fn ranges(&self) -> impl Iterator<Item = &TreeSelectionRange<N>> + '_ {
        self.order.iter().filter_map(|id| self.ranges.get(id))
    }

    /// Range currently owning `node`.
    pub fn range_for_node(&self, node: N) -> Option<&TreeSelectionRange<N>> {
        self.node_index.get(&node).and_then(|id| self.ranges.get(id))
    }

    /// Identifier of the range currently owning `node`.
    pub fn range_id(&self, node: N) -> Option<RangeId> {
        self.node_index.get(&node).copied()
    }

    /// Every selected node in row order.
    pub fn selected_nodes(&self) -> Vec<N> {
        self.ranges().flat_map(TreeSelectionRange::nodes).collect()
    }

    /// Every selected path in row order.
    pub fn selected_paths(&self) -> Vec<TreePath> {
        self.ranges()
            .flat_map(|range| range.paths().cloned())
            .collect()
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            selected: self.len(),
            ranges: self
                .ranges()
                .filter_map(TreeSelectionRange::summary)
                .collect(),
        }
    }

    /// Select `node`, extending or joining adjoining ranges.
    ///
    /// Returns `Ok(false)` without emitting anything when the node is already selected. Otherwise
    /// emits `selection-extended` when the node landed in an existing range, then
    /// `selection-changed`.
    ///
    /// # Errors
    ///
    /// Fails when a neighbour is flagged selected in the tree but unknown to the index, or when
    /// both neighbours already share one range. Both mean the selection is corrupt.
    pub fn add<M>(&mut self, model: &mut M, node: N) -> Result<bool, SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        if self.contains(node) {
            return Ok(false);
        }

        let delta = match self.insert_node(model, node)? {
            Placement::Started(_) => None,
            Placement::Extended(_, delta) | Placement::Joined(_, delta) => Some(delta),
        };
        self.verify(model)?;

        if let Some(delta) = delta {
            self.events.emit(&SelectionEvent::Extended(delta));
        }
        self.events.emit(&SelectionEvent::Changed);
        Ok(true)
    }

    /// Deselect `node`, trimming or splitting its range.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NotSelected`] when `node` is not in the index. Unlike
    /// [`TreeSelection::add`], removing an unselected node is never a no-op.
    pub fn remove<M>(&mut self, model: &mut M, node: N) -> Result<(), SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        let id = self
            .range_id(node)
            .ok_or_else(|| SelectionError::not_selected(node))?;
        let range = self
            .ranges
            .get_mut(&id)
            .ok_or(SelectionError::MissingRange(id))?;
        let tail = range.split(node)?;
        let emptied = range.is_empty();

        self.node_index.remove(&node);
        if let Some(tail) = tail {
            let tail_id = self.allocate(tail);
            if let Some(moved) = self.ranges.get(&tail_id) {
                for member in moved.nodes() {
                    self.node_index.insert(member, tail_id);
                }
            }
            tracing::debug!(node = ?node, range = %id, tail = %tail_id, "split range");
        }
        if emptied {
            self.detach(id);
            tracing::debug!(node = ?node, range = %id, "dropped empty range");
        }
        model.set_selected(node, false);
        self.verify(model)?;

        self.events.emit(&SelectionEvent::Changed);
        Ok(())
    }

    /// Add `node` when unselected, remove it otherwise. Returns the new selected state.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`TreeSelection::add`] and [`TreeSelection::remove`].
    pub fn toggle<M>(&mut self, model: &mut M, node: N) -> Result<bool, SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        if self.contains(node) {
            self.remove(model, node)?;
            Ok(false)
        } else {
            self.add(model, node)?;
            Ok(true)
        }
    }

    /// Select every node below `root` (and `root` itself when `include_root`).
    ///
    /// Emits a single `selection-changed` and no `selection-extended`. Returns how many nodes
    /// became selected.
    ///
    /// # Errors
    ///
    /// Propagates neighbour lookup failures from the single-node add path.
    pub fn select_all<M>(
        &mut self,
        model: &mut M,
        root: N,
        include_root: bool,
    ) -> Result<usize, SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        let candidates: Vec<N> = include_root
            .then_some(root)
            .into_iter()
            .chain(walk::descendants(&*model, root))
            .collect();
        self.add_batch(model, candidates)
    }

    /// Select every node between `anchor` and `target` inclusive, in either direction.
    ///
    /// Batched like [`TreeSelection::select_all`].
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::SpanUnreachable`] when walking forward from the earlier node
    /// never meets the later one.
    pub fn select_span<M>(
        &mut self,
        model: &mut M,
        anchor: N,
        target: N,
    ) -> Result<usize, SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        let (first, last) = if model.path(anchor) <= model.path(target) {
            (anchor, target)
        } else {
            (target, anchor)
        };

        let mut span = vec![first];
        let mut cursor = first;
        while cursor != last {
            cursor = walk::next_node(&*model, cursor).ok_or_else(|| {
                SelectionError::SpanUnreachable {
                    anchor: format!("{first:?}"),
                    target: format!("{last:?}"),
                }
            })?;
            span.push(cursor);
        }
        self.add_batch(model, span)
    }

    /// Deselect everything and emit `selection-cleared`.
    pub fn clear<M>(&mut self, model: &mut M)
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        for node in self.node_index.keys() {
            model.set_selected(*node, false);
        }
        tracing::debug!(
            nodes = self.node_index.len(),
            ranges = self.order.len(),
            "clear selection"
        );
        self.ranges.clear();
        self.order.clear();
        self.node_index.clear();
        self.events.emit(&SelectionEvent::Cleared);
    }

    /// Check every structural invariant against the tree.
    ///
    /// Ranges must be non-empty, internally contiguous, sorted, and neither overlapping nor
    /// adjacent. The node index must map exactly the members of the ranges, and every member must
    /// be flagged selected in the tree.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Invariant`] describing the first violation found.
    pub fn validate<M>(&self, model: &M) -> Result<(), SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        let violation = |message: String| Err(SelectionError::Invariant(message));

        if self.ranges.len() != self.order.len() {
            return violation(format!(
                "{} ranges stored but {} ordered",
                self.ranges.len(),
                self.order.len()
            ));
        }

        let mut members = 0;
        let mut previous: Option<&TreeSelectionRange<N>> = None;
        for id in &self.order {
            let Some(range) = self.ranges.get(id) else {
                return violation(format!("ordered range {id} is missing"));
            };
            let (Some(first), Some(last)) = (range.first_node(), range.last_node()) else {
                return violation(format!("range {id} is empty"));
            };

            if let Some(before) = previous {
                if before.end() >= range.start() {
                    return violation(format!("range {id} overlaps or precedes its predecessor"));
                }
                let follower = before
                    .last_node()
                    .and_then(|tail| walk::next_node(model, tail));
                if follower == Some(first) {
                    return violation(format!("range {id} is adjacent to its predecessor"));
                }
            }

            let mut expected = Some(first);
            for member in range.iter() {
                if expected != Some(member.node) {
                    return violation(format!("range {id} is not contiguous at {:?}", member.node));
                }
                if model.path(member.node) != member.path {
                    return violation(format!("stale path cached for {:?}", member.node));
                }
                if self.node_index.get(&member.node) != Some(id) {
                    return violation(format!("{:?} is not indexed to range {id}", member.node));
                }
                if !model.is_selected(member.node) {
                    return violation(format!("{:?} is not flagged selected", member.node));
                }
                expected = if member.node == last {
                    None
                } else {
                    walk::next_node(model, member.node)
                };
            }

            members += range.len();
            previous = Some(range);
        }

        if members != self.node_index.len() {
            return violation(format!(
                "{} indexed nodes but {members} range members",
                self.node_index.len()
            ));
        }
        Ok(())
    }

    fn verify<M>(&self, model: &M) -> Result<(), SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        if self.options.verify_invariants {
            self.validate(model)?;
        }
        Ok(())
    }

    fn add_batch<M>(
        &mut self,
        model: &mut M,
        nodes: impl IntoIterator<Item = N>,
    ) -> Result<usize, SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        let mut added = 0;
        for node in nodes {
            if self.contains(node) {
                continue;
            }
            self.insert_node(model, node)?;
            added += 1;
        }
        self.verify(model)?;

        tracing::debug!(added, ranges = self.order.len(), "batched selection");
        self.events.emit(&SelectionEvent::Changed);
        Ok(added)
    }

    fn insert_node<M>(&mut self, model: &mut M, node: N) -> Result<Placement, SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        let before = self.adjoining_range(model, walk::prev_node(model, node))?;
        let after = self.adjoining_range(model, walk::next_node(model, node))?;
        let path = model.path(node);

        let placement = match (before, after) {
            (None, None) => {
                let id = self.allocate(TreeSelectionRange::singleton(node, path));
                self.node_index.insert(node, id);
                Placement::Started(id)
            }
            (Some(id), None) => {
                self.range_mut(id)?.push_back(node, path.clone());
                self.node_index.insert(node, id);
                Placement::Extended(id, vec![path])
            }
            (None, Some(id)) => {
                self.range_mut(id)?.push_front(node, path.clone());
                self.node_index.insert(node, id);
                Placement::Extended(id, vec![path])
            }
            (Some(first), Some(second)) if first == second => {
                return Err(SelectionError::NeighborsShareRange {
                    node: format!("{node:?}"),
                    range: first,
                });
            }
            (Some(first), Some(second)) => {
                let delta = self.join(node, path, first, second)?;
                Placement::Joined(first, delta)
            }
        };
        model.set_selected(node, true);

        match &placement {
            Placement::Started(id) => {
                tracing::debug!(node = ?node, range = %id, "started range");
            }
            Placement::Extended(id, _) => {
                tracing::debug!(node = ?node, range = %id, "extended range");
            }
            Placement::Joined(id, delta) => {
                tracing::debug!(node = ?node, range = %id, absorbed = delta.len() - 1, "joined ranges");
            }
        }
        Ok(placement)
    }

    /// Range of an already selected neighbour. A neighbour flagged selected in the tree but
    /// absent from the index means the two have drifted apart.
    fn adjoining_range<M>(
        &self,
        model: &M,
        neighbor: Option<N>,
    ) -> Result<Option<RangeId>, SelectionError>
    where
        M: TreeModel<Node = N> + ?Sized,
    {
        let Some(neighbor) = neighbor else {
            return Ok(None);
        };
        match self.node_index.get(&neighbor) {
            Some(id) => Ok(Some(*id)),
            None if model.is_selected(neighbor) => Err(SelectionError::unindexed(neighbor)),
            None => Ok(None),
        }
    }

    /// Merge `absorbed` into `survivor` through the bridging `node`. Returns the row-order delta:
    /// the bridging path followed by every absorbed path.
    fn join(
        &mut self,
        node: N,
        path: TreePath,
        survivor: RangeId,
        absorbed: RangeId,
    ) -> Result<Vec<TreePath>, SelectionError> {
        if !self.ranges.contains_key(&survivor) {
            return Err(SelectionError::MissingRange(survivor));
        }
        let consumed = self
            .ranges
            .remove(&absorbed)
            .ok_or(SelectionError::MissingRange(absorbed))?;
        self.order.retain(|id| *id != absorbed);

        let target = self
            .ranges
            .get_mut(&survivor)
            .ok_or(SelectionError::MissingRange(survivor))?;
        let mut delta = Vec::with_capacity(consumed.len() + 1);
        delta.push(path.clone());
        target.insert(-1, node, path)?;
        self.node_index.insert(node, survivor);

        for member in consumed.into_members() {
            delta.push(member.path.clone());
            self.node_index.insert(member.node, survivor);
            target.push_back(member.node, member.path);
        }
        Ok(delta)
    }

    /// Store `range` under a fresh id at its row-order position.
    fn allocate(&mut self, range: TreeSelectionRange<N>) -> RangeId {
        let id = RangeId(self.next_range);
        self.next_range += 1;

        let position = match range.start() {
            Some(start) => self.order.partition_point(|existing| {
                self.ranges
                    .get(existing)
                    .and_then(TreeSelectionRange::start)
                    .is_some_and(|other| other < start)
            }),
            None => self.order.len(),
        };
        self.order.insert(position, id);
        self.ranges.insert(id, range);
        id
    }

    fn detach(&mut self, id: RangeId) {
        self.ranges.remove(&id);
        self.order.retain(|existing| *existing != id);
    }

    fn range_mut(&mut self, id: RangeId) -> Result<&mut TreeSelectionRange<N>, SelectionError> {
        self.ranges
            .get_mut(&id)
            .ok_or(SelectionError::MissingRange(id))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::domain::tree::{ArenaTree, NodeId};

    //  root
    //    a        [0]
    //      a0     [0, 0]
    //      a1     [0, 1]
    //      a2     [0, 2]
    //    b        [1]
    //    c        [2]
    fn sample() -> ArenaTree {
        let mut tree = ArenaTree::new("root");
        let root = tree.root();
        let a = tree.push_child(root, "a").unwrap();
        for label in ["a0", "a1", "a2"] {
            tree.push_child(a, label).unwrap();
        }
        tree.push_child(root, "b").unwrap();
        tree.push_child(root, "c").unwrap();
        tree
    }

    fn node(tree: &ArenaTree, label: &str) -> NodeId {
        tree.find(label).unwrap()
    }

    fn checked() -> TreeSelection<NodeId> {
        TreeSelection::with_options(SelectionOptions {
            include_root: false,
            verify_invariants: true,
        })
    }

    fn recorder(selection: &mut TreeSelection<NodeId>) -> Rc<RefCell<Vec<SelectionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        selection.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    fn bounds(selection: &TreeSelection<NodeId>) -> Vec<String> {
        selection
            .summary()
            .ranges
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn re_adding_selected_node_is_silent() {
        let mut tree = sample();
        let mut selection = checked();
        let a = node(&tree, "a");
        assert!(selection.add(&mut tree, a).unwrap());

        let events = recorder(&mut selection);
        assert!(!selection.add(&mut tree, a).unwrap());
        assert!(events.borrow().is_empty());
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn add_sets_and_remove_clears_tree_flag() {
        let mut tree = sample();
        let mut selection = checked();
        let b = node(&tree, "b");
        selection.add(&mut tree, b).unwrap();
        assert!(tree.is_selected(b));
        selection.remove(&mut tree, b).unwrap();
        assert!(!tree.is_selected(b));
        assert!(selection.is_empty());
        assert_eq!(selection.range_count(), 0);
    }

    #[test]
    fn prepending_before_range_extends_it() {
        let mut tree = sample();
        let mut selection = checked();
        let a2 = node(&tree, "a2");
        selection.add(&mut tree, a2).unwrap();
        let events = recorder(&mut selection);
        let a1 = node(&tree, "a1");
        selection.add(&mut tree, a1).unwrap();

        assert_eq!(bounds(&selection), ["[0, 1]..[0, 2] (2)"]);
        assert_eq!(
            *events.borrow(),
            [
                SelectionEvent::Extended(vec![TreePath::from([0, 1])]),
                SelectionEvent::Changed
            ]
        );
    }

    #[test]
    fn removing_interior_node_splits_range() {
        let mut tree = sample();
        let mut selection = checked();
        let root = tree.root();
        selection.select_all(&mut tree, root, false).unwrap();
        assert_eq!(bounds(&selection), ["[0]..[2] (6)"]);

        let a1 = node(&tree, "a1");
        selection.remove(&mut tree, a1).unwrap();
        assert_eq!(bounds(&selection), ["[0]..[0, 0] (2)", "[0, 2]..[2] (3)"]);

        let c = node(&tree, "c");
        let tail = selection.range_id(c).unwrap();
        assert_eq!(selection.range_id(node(&tree, "a2")), Some(tail));
        assert_ne!(selection.range_id(node(&tree, "a")), Some(tail));
    }

    #[test]
    fn removing_edges_trims_without_new_ranges() {
        let mut tree = sample();
        let mut selection = checked();
        let a = node(&tree, "a");
        selection.select_all(&mut tree, a, true).unwrap();
        selection.remove(&mut tree, a).unwrap();
        let a2 = node(&tree, "a2");
        selection.remove(&mut tree, a2).unwrap();
        assert_eq!(bounds(&selection), ["[0, 0]..[0, 1] (2)"]);
    }

    #[test]
    fn re_adding_removed_interior_node_rejoins() {
        let mut tree = sample();
        let mut selection = checked();
        let a = node(&tree, "a");
        selection.select_all(&mut tree, a, true).unwrap();
        let a1 = node(&tree, "a1");
        selection.remove(&mut tree, a1).unwrap();

        let events = recorder(&mut selection);
        selection.add(&mut tree, a1).unwrap();
        assert_eq!(bounds(&selection), ["[0]..[0, 2] (4)"]);
        assert_eq!(
            events.borrow()[0],
            SelectionEvent::Extended(vec![TreePath::from([0, 1]), TreePath::from([0, 2])])
        );
    }

    #[test]
    fn joined_members_share_one_range() {
        let mut tree = sample();
        let mut selection = checked();
        for label in ["a0", "a2", "a1"] {
            let id = node(&tree, label);
            selection.add(&mut tree, id).unwrap();
        }
        assert_eq!(selection.range_count(), 1);

        let a0 = node(&tree, "a0");
        let joined = selection.range_for_node(a0).unwrap();
        assert_eq!(joined.len(), 3);
        for label in ["a1", "a2"] {
            let member = selection.range_for_node(node(&tree, label)).unwrap();
            assert!(std::ptr::eq(joined, member));
        }
        assert!(selection.range_for_node(node(&tree, "b")).is_none());
    }

    #[test]
    fn remove_of_unselected_node_is_an_error() {
        let mut tree = sample();
        let mut selection = checked();
        let b = node(&tree, "b");
        assert_eq!(
            selection.remove(&mut tree, b),
            Err(SelectionError::NotSelected {
                node: format!("{b:?}")
            })
        );
    }

    #[test]
    fn flagged_but_unindexed_neighbour_is_an_error() {
        let mut tree = sample();
        let mut selection = checked();
        let a0 = node(&tree, "a0");
        tree.set_selected(a0, true);
        let a1 = node(&tree, "a1");
        let result = selection.add(&mut tree, a1);
        assert!(matches!(result, Err(SelectionError::UnindexedNeighbor { .. })));
        assert!(selection.is_empty());
    }

    #[test]
    fn clear_resets_everything_and_emits_cleared_only() {
        let mut tree = sample();
        let mut selection = checked();
        let root = tree.root();
        selection.select_all(&mut tree, root, true).unwrap();
        let events = recorder(&mut selection);

        selection.clear(&mut tree);
        assert!(selection.is_empty());
        assert_eq!(selection.range_count(), 0);
        assert!(tree.nodes().all(|id| !tree.is_selected(id)));
        assert_eq!(*events.borrow(), [SelectionEvent::Cleared]);
    }

    #[test]
    fn select_all_emits_single_change() {
        let mut tree = sample();
        let mut selection = checked();
        let a1 = node(&tree, "a1");
        selection.add(&mut tree, a1).unwrap();
        let events = recorder(&mut selection);

        let root = tree.root();
        let added = selection.select_all(&mut tree, root, false).unwrap();
        assert_eq!(added, 5);
        assert_eq!(*events.borrow(), [SelectionEvent::Changed]);
        assert_eq!(bounds(&selection), ["[0]..[2] (6)"]);
        assert!(!selection.contains(root));
    }

    #[test]
    fn select_span_works_in_both_directions() {
        let mut tree = sample();
        let mut selection = checked();
        let (b, a1) = (node(&tree, "b"), node(&tree, "a1"));
        let added = selection.select_span(&mut tree, b, a1).unwrap();
        assert_eq!(added, 3);
        assert_eq!(bounds(&selection), ["[0, 1]..[1] (3)"]);
        assert_eq!(
            selection.selected_paths(),
            [
                TreePath::from([0, 1]),
                TreePath::from([0, 2]),
                TreePath::from([1])
            ]
        );
    }

    #[test]
    fn toggle_flips_membership() {
        let mut tree = sample();
        let mut selection = checked();
        let c = node(&tree, "c");
        assert!(selection.toggle(&mut tree, c).unwrap());
        assert!(!selection.toggle(&mut tree, c).unwrap());
        assert!(selection.is_empty());
    }

    #[test]
    fn selected_nodes_follow_row_order() {
        let mut tree = sample();
        let mut selection = checked();
        for label in ["c", "a0", "b", "a2"] {
            let id = node(&tree, label);
            selection.add(&mut tree, id).unwrap();
        }
        let labels: Vec<&str> = selection
            .selected_nodes()
            .into_iter()
            .filter_map(|id| tree.label(id))
            .collect();
        assert_eq!(labels, ["a0", "a2", "b", "c"]);
        assert_eq!(selection.range_count(), 2);
        selection.validate(&tree).unwrap();
    }

    #[test]
    fn validate_detects_flag_drift() {
        let mut tree = sample();
        let mut selection = TreeSelection::new();
        let b = node(&tree, "b");
        selection.add(&mut tree, b).unwrap();
        tree.set_selected(b, false);
        assert!(matches!(
            selection.validate(&tree),
            Err(SelectionError::Invariant(_))
        ));
    }
}
