//! Loading trees from indented outline files.
//!
//! One label per line; deeper indentation nests under the closest shallower line above it. The
//! first label is the root. Blank lines and lines starting with `#` are skipped.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use crate::domain::tree::{ArenaTree, NodeId};

/// Read and parse an outline file.
pub fn load_outline(path: &Path) -> Result<ArenaTree> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read outline file: {}", path.display()))?;
    parse_outline(&text).with_context(|| format!("invalid outline file: {}", path.display()))
}

/// Parse outline text into an [`ArenaTree`].
pub fn parse_outline(text: &str) -> Result<ArenaTree> {
    let mut tree: Option<ArenaTree> = None;
    let mut stack: Vec<(usize, NodeId)> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let label = raw.trim();
        if label.is_empty() || label.starts_with('#') {
            continue;
        }
        if !seen.insert(label) {
            bail!("line {line}: duplicate label `{label}`");
        }
        let indent = raw.len() - raw.trim_start().len();

        let Some(current) = tree.as_mut() else {
            let created = ArenaTree::new(label);
            stack.push((indent, created.root()));
            tree = Some(created);
            continue;
        };

        while stack.last().is_some_and(|(depth, _)| *depth >= indent) {
            stack.pop();
        }
        let Some(&(_, parent)) = stack.last() else {
            bail!("line {line}: `{label}` would be a second root");
        };
        let node = current
            .push_child(parent, label)
            .with_context(|| format!("line {line}: parent of `{label}` is missing"))?;
        stack.push((indent, node));
    }

    let tree = tree.ok_or_else(|| anyhow!("outline contains no nodes"))?;
    tracing::debug!(nodes = tree.node_count(), "parsed outline");
    Ok(tree)
}
