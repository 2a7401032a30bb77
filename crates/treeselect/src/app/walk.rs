//! Row-order navigation over a [`TreeModel`].
//!
//! `prev_node`/`next_node` cost O(depth) and are meant for range boundaries, not for full
//! traversals. [`Descendants`] covers full subtree walks.

use crate::domain::model::TreeModel;

/// Node displayed immediately above `node`, or `None` for the root.
pub fn prev_node<M: TreeModel + ?Sized>(model: &M, node: M::Node) -> Option<M::Node> {
    let Some(mut cursor) = model.previous_sibling(node) else {
        return model.parent(node);
    };
    while let Some(last) = model.last_child(cursor) {
        cursor = last;
    }
    Some(cursor)
}

/// Node displayed immediately below `node`, or `None` past the end of the tree.
pub fn next_node<M: TreeModel + ?Sized>(model: &M, node: M::Node) -> Option<M::Node> {
    if let Some(child) = model.first_child(node) {
        return Some(child);
    }
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if let Some(sibling) = model.next_sibling(current) {
            return Some(sibling);
        }
        cursor = model.parent(current);
    }
    None
}

/// Pre-order walk of every node below a root, in row order. The root itself is not yielded.
#[derive(Debug)]
pub struct Descendants<'a, M: TreeModel + ?Sized> {
    model: &'a M,
    stack: Vec<M::Node>,
}

impl<'a, M: TreeModel + ?Sized> Descendants<'a, M> {
    pub fn new(model: &'a M, root: M::Node) -> Self {
        let mut walk = Self {
            model,
            stack: Vec::new(),
        };
        walk.push_children(root);
        walk
    }

    fn push_children(&mut self, node: M::Node) {
        let model = self.model;
        let count = model.child_count(node);
        self.stack
            .extend((0..count).rev().filter_map(|index| model.child(node, index)));
    }
}

impl<M: TreeModel + ?Sized> Iterator for Descendants<'_, M> {
    type Item = M::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_children(node);
        Some(node)
    }
}

/// Convenience constructor for [`Descendants`].
pub fn descendants<M: TreeModel + ?Sized>(model: &M, root: M::Node) -> Descendants<'_, M> {
    Descendants::new(model, root)
}
