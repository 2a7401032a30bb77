//! Arena-backed labelled tree implementing [`TreeModel`].

use crate::domain::model::TreeModel;
use crate::domain::path::TreePath;

/// Handle of a node stored in an [`ArenaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct ArenaNode {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    position: usize,
    selected: bool,
}

/// Tree of labelled nodes addressed by [`NodeId`]. The root is created with the tree and nodes are
/// only ever appended.
#[derive(Debug, Clone)]
pub struct ArenaTree {
    nodes: Vec<ArenaNode>,
}

impl ArenaTree {
    /// Create a tree containing only a root node.
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            nodes: vec![ArenaNode {
                label: root_label.into(),
                parent: None,
                children: Vec::new(),
                position: 0,
                selected: false,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append a new last child under `parent`. Returns `None` when `parent` is not part of this
    /// tree.
    pub fn push_child(&mut self, parent: NodeId, label: impl Into<String>) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        let siblings = &mut self.nodes.get_mut(parent.0)?.children;
        let position = siblings.len();
        siblings.push(id);
        self.nodes.push(ArenaNode {
            label: label.into(),
            parent: Some(parent),
            children: Vec::new(),
            position,
            selected: false,
        });
        Some(id)
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|entry| entry.label.as_str())
    }

    /// First node (in creation order) carrying `label`.
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|entry| entry.label == label)
            .map(NodeId)
    }

    /// Resolve a path of sibling indices starting at the root.
    pub fn node_at(&self, path: &[usize]) -> Option<NodeId> {
        path.iter().try_fold(self.root(), |current, index| {
            self.nodes.get(current.0)?.children.get(*index).copied()
        })
    }

    /// All node handles in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    fn entry(&self, node: NodeId) -> Option<&ArenaNode> {
        self.nodes.get(node.0)
    }

    fn sibling_at(&self, node: NodeId, offset: isize) -> Option<NodeId> {
        let entry = self.entry(node)?;
        let parent = self.entry(entry.parent?)?;
        let position = entry.position.checked_add_signed(offset)?;
        parent.children.get(position).copied()
    }
}

impl TreeModel for ArenaTree {
    type Node = NodeId;

    fn path(&self, node: NodeId) -> TreePath {
        let mut indices = Vec::new();
        let mut cursor = self.entry(node);
        while let Some(entry) = cursor {
            let Some(parent) = entry.parent else {
                break;
            };
            indices.push(entry.position);
            cursor = self.entry(parent);
        }
        indices.reverse();
        TreePath::from(indices)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node)?.parent
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.entry(node).map_or(0, |entry| entry.children.len())
    }

    fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.entry(node)?.children.get(index).copied()
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling_at(node, -1)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.sibling_at(node, 1)
    }

    fn is_selected(&self, node: NodeId) -> bool {
        self.entry(node).is_some_and(|entry| entry.selected)
    }

    fn set_selected(&mut self, node: NodeId, selected: bool) {
        if let Some(entry) = self.nodes.get_mut(node.0) {
            entry.selected = selected;
        }
    }
}
