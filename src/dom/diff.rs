//! Snapshot delta computation
//!
//! Given a tree and the set of ids an agent has already seen, extracts
//! the subtree of nodes that lead to unseen ids. The precomputed
//! per-node id unions make the "anything new below here?" test a set
//! intersection instead of a subtree walk.

use crate::dom::node::{DomNode, DomTree, NodeId, TreeAssembler};
use std::collections::HashSet;
use tracing::debug;

/// Reduce a tree to the parts containing ids not in `known_ids`.
///
/// Content under a new interaction node is kept wholesale so the caller
/// sees the new element with its full label. Returns `None` when every
/// id in the tree is already known.
pub fn diff_new_ids(tree: &DomTree, known_ids: &HashSet<String>) -> Option<DomTree> {
    let root = tree.node(tree.root());
    if root
        .subtree_ids()
        .iter()
        .all(|id| known_ids.contains(id))
    {
        debug!(url = tree.page_url(), "no unseen ids in snapshot");
        return None;
    }
    let mut assembler = TreeAssembler::default();
    let root = diff_rec(tree, tree.root(), known_ids, false, &mut assembler)?;
    Some(assembler.seal(root, tree.page_url().to_string()))
}

fn diff_rec(
    tree: &DomTree,
    id: NodeId,
    known_ids: &HashSet<String>,
    under_new: bool,
    assembler: &mut TreeAssembler,
) -> Option<NodeId> {
    let node = tree.node(id);
    let own_new = node
        .id
        .as_ref()
        .map(|own| !known_ids.contains(own))
        .unwrap_or(false);
    let subtree_new = node
        .subtree_ids()
        .iter()
        .any(|sub| !known_ids.contains(sub));
    if !under_new && !subtree_new {
        return None;
    }
    let children: Vec<NodeId> = node
        .children
        .iter()
        .filter_map(|child| diff_rec(tree, *child, known_ids, under_new || own_new, assembler))
        .collect();
    Some(assembler.push(DomNode {
        children,
        subtree_ids: Vec::new(),
        ..node.clone()
    }))
}
