use std::cell::RefCell;
use std::rc::Rc;

use treeselect::app::events::SelectionEvent;
use treeselect::app::selection::{SelectionOptions, TreeSelection};
use treeselect::domain::path::TreePath;
use treeselect::domain::tree::{ArenaTree, NodeId};

// root
//   C0            [0]
//     C0.0        [0, 0]
//     C0.1        [0, 1]
//     C0.2        [0, 2]
//   C1            [1]
//     C1.0 .. C1.2
//   C2, C3, C4
fn fixture() -> ArenaTree {
    let mut tree = ArenaTree::new("root");
    let root = tree.root();
    for top in 0..5 {
        let child = tree.push_child(root, format!("C{top}")).expect("root exists");
        if top < 2 {
            for grandchild in 0..3 {
                tree.push_child(child, format!("C{top}.{grandchild}"))
                    .expect("child exists");
            }
        }
    }
    tree
}

struct Harness {
    tree: ArenaTree,
    selection: TreeSelection<NodeId>,
    events: Rc<RefCell<Vec<SelectionEvent>>>,
}

impl Harness {
    fn new() -> Self {
        let mut selection = TreeSelection::with_options(SelectionOptions {
            include_root: false,
            verify_invariants: true,
        });
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        selection.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        Self {
            tree: fixture(),
            selection,
            events,
        }
    }

    fn node(&self, label: &str) -> NodeId {
        self.tree.find(label).expect("label exists")
    }

    fn add(&mut self, label: &str) {
        let node = self.node(label);
        self.selection.add(&mut self.tree, node).expect("add succeeds");
    }

    fn remove(&mut self, label: &str) {
        let node = self.node(label);
        self.selection
            .remove(&mut self.tree, node)
            .expect("remove succeeds");
    }

    fn ranges(&self) -> Vec<(TreePath, TreePath, usize)> {
        self.selection
            .summary()
            .ranges
            .into_iter()
            .map(|range| (range.start, range.end, range.len))
            .collect()
    }

    fn take_events(&self) -> Vec<SelectionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

fn path<const N: usize>(indices: [usize; N]) -> TreePath {
    TreePath::from(indices)
}

#[test]
fn single_add_creates_singleton_range() {
    let mut harness = Harness::new();
    harness.add("C0");
    assert_eq!(harness.ranges(), [(path([0]), path([0]), 1)]);
    assert_eq!(harness.take_events(), [SelectionEvent::Changed]);
}

#[test]
fn sequential_children_form_one_range() {
    let mut harness = Harness::new();
    for label in ["C0.0", "C0.1", "C0.2"] {
        harness.add(label);
    }
    assert_eq!(harness.ranges(), [(path([0, 0]), path([0, 2]), 3)]);
}

#[test]
fn parent_then_first_child_extends_across_depth() {
    let mut harness = Harness::new();
    harness.add("C0");
    harness.take_events();
    harness.add("C0.0");

    assert_eq!(harness.ranges(), [(path([0]), path([0, 0]), 2)]);
    assert_eq!(
        harness.take_events(),
        [
            SelectionEvent::Extended(vec![path([0, 0])]),
            SelectionEvent::Changed
        ]
    );
}

#[test]
fn last_child_then_parents_next_sibling_extends_across_siblings() {
    let mut harness = Harness::new();
    harness.add("C0.2");
    harness.add("C1");
    assert_eq!(harness.ranges(), [(path([0, 2]), path([1]), 2)]);
}

#[test]
fn last_child_and_cousin_stay_apart_until_bridged() {
    let mut harness = Harness::new();
    harness.add("C0.2");
    harness.add("C1.0");
    // A last child is not adjacent to its parent's next sibling's first child: C1 sits between
    // them in row order, so the two only merge once C1 is selected.
    assert_eq!(
        harness.ranges(),
        [(path([0, 2]), path([0, 2]), 1), (path([1, 0]), path([1, 0]), 1)]
    );

    harness.take_events();
    harness.add("C1");
    assert_eq!(harness.ranges(), [(path([0, 2]), path([1, 0]), 3)]);
    assert_eq!(
        harness.take_events(),
        [
            SelectionEvent::Extended(vec![path([1]), path([1, 0])]),
            SelectionEvent::Changed
        ]
    );
}

#[test]
fn bridging_child_joins_parent_and_sibling_ranges() {
    let mut harness = Harness::new();
    harness.add("C0");
    harness.add("C0.1");
    assert_eq!(
        harness.ranges(),
        [(path([0]), path([0]), 1), (path([0, 1]), path([0, 1]), 1)]
    );

    harness.take_events();
    harness.add("C0.0");
    assert_eq!(harness.ranges(), [(path([0]), path([0, 1]), 3)]);
    assert_eq!(
        harness.take_events(),
        [
            SelectionEvent::Extended(vec![path([0, 0]), path([0, 1])]),
            SelectionEvent::Changed
        ]
    );

    let c0 = harness.node("C0");
    let c01 = harness.node("C0.1");
    assert_eq!(harness.selection.range_id(c0), harness.selection.range_id(c01));
}

#[test]
fn add_then_remove_leaves_nothing_and_never_clears() {
    let mut harness = Harness::new();
    harness.add("C0");
    harness.remove("C0");

    assert!(harness.ranges().is_empty());
    assert!(harness.selection.is_empty());
    assert_eq!(
        harness.take_events(),
        [SelectionEvent::Changed, SelectionEvent::Changed]
    );
}

#[test]
fn last_grandchild_joins_following_top_level_node() {
    let mut harness = Harness::new();
    harness.add("C1.2");
    harness.add("C3");
    harness.add("C2");
    assert_eq!(harness.ranges(), [(path([1, 2]), path([3]), 3)]);
}

#[test]
fn removing_middle_of_join_restores_two_ranges() {
    let mut harness = Harness::new();
    for label in ["C0", "C0.1", "C0.0"] {
        harness.add(label);
    }
    harness.remove("C0.0");
    assert_eq!(
        harness.ranges(),
        [(path([0]), path([0]), 1), (path([0, 1]), path([0, 1]), 1)]
    );
}

#[test]
fn select_all_then_clear_round_trip() {
    let mut harness = Harness::new();
    let root = harness.tree.root();
    let added = harness
        .selection
        .select_all(&mut harness.tree, root, true)
        .expect("select all");
    assert_eq!(added, harness.tree.node_count());
    assert_eq!(harness.ranges(), [(TreePath::root(), path([4]), 12)]);

    harness.selection.clear(&mut harness.tree);
    assert!(harness.ranges().is_empty());
    assert_eq!(
        harness.take_events(),
        [SelectionEvent::Changed, SelectionEvent::Cleared]
    );
}
