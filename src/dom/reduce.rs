//! Tree reduction: pruning and single-child folding
//!
//! Shrinks a snapshot tree for presentation without losing any
//! addressable node. Pruning drops blank text leaves (and, on request,
//! hidden subtrees); folding collapses single-child chains, merging the
//! pair's role, text and identity under tie-break rules that always
//! preserve ids. Both passes refuse destructive outcomes: a prune that
//! would empty the tree returns the tree unchanged, and a fold that
//! would have to discard one of two ids keeps the chain as-is.

use crate::dom::node::{DomNode, DomTree, NodeId, TreeAssembler};
use crate::dom::role::{NodeCategory, NodeKind, NodeRole, Role};
use tracing::{debug, instrument};

/// Roles that carry no information of their own and always yield to the
/// other side of a fold
static LOW_PRIORITY_ROLES: &[&str] = &["none", "generic", "group"];

/// Reduces snapshot trees by pruning and folding
pub struct TreeReducer;

impl TreeReducer {
    /// Prune blank text leaves, then fold single-child chains.
    #[instrument(skip(tree), fields(nodes = tree.len()))]
    pub fn reduce(tree: &DomTree) -> DomTree {
        Self::run(tree, false)
    }

    /// Like [`TreeReducer::reduce`], additionally dropping subtrees
    /// marked hidden or invisible. Opt-in: hidden elements can still be
    /// legitimate action targets (collapsed menus, offscreen carousels).
    #[instrument(skip(tree), fields(nodes = tree.len()))]
    pub fn reduce_with_hidden(tree: &DomTree) -> DomTree {
        Self::run(tree, true)
    }

    fn run(tree: &DomTree, drop_hidden: bool) -> DomTree {
        let pruned = match tree.subtree_filter(|node| keep(node, drop_hidden)) {
            Some(pruned) => pruned,
            None => {
                debug!(url = tree.page_url(), "pruning would empty the tree, keeping it unchanged");
                tree.clone()
            }
        };
        let folded = fold(&pruned, pruned.root());
        let mut assembler = TreeAssembler::default();
        let root = push_folded(folded, &mut assembler);
        let reduced = assembler.seal(root, pruned.page_url().to_string());
        debug!(before = tree.len(), after = reduced.len(), "tree reduced");
        reduced
    }
}

fn keep(node: &DomNode, drop_hidden: bool) -> bool {
    if drop_hidden {
        if let Some(attrs) = &node.attributes {
            if attrs.hidden == Some(true)
                || attrs.visible == Some(false)
                || attrs.aria_hidden == Some(true)
                || attrs.input_type.as_deref() == Some("hidden")
            {
                return false;
            }
        }
    }
    if node.kind == NodeKind::Text {
        return !node.text.trim().is_empty();
    }
    true
}

/// A folded subtree, detached from any arena
struct Folded {
    node: DomNode,
    children: Vec<Folded>,
}

fn fold(tree: &DomTree, id: NodeId) -> Folded {
    let source = tree.node(id);
    let children: Vec<Folded> = source.children.iter().map(|child| fold(tree, *child)).collect();
    let mut node = source.clone();
    node.children = Vec::new();
    node.subtree_ids = Vec::new();

    let mergeable = children.len() == 1 && !(node.id.is_some() && children[0].node.id.is_some());
    if mergeable {
        let mut children = children.into_iter();
        match children.next() {
            Some(child) => merge(node, child),
            None => Folded {
                node,
                children: Vec::new(),
            },
        }
    } else {
        Folded { node, children }
    }
}

/// Merge a parent with its only child. Identity (id, kind, attributes,
/// selectors) follows whichever side carries the id; with no id on
/// either side the child wins unless it is a list or structural
/// container. Role and text are combined by the tie-break rules.
fn merge(parent: DomNode, child: Folded) -> Folded {
    let Folded {
        node: child_node,
        children: grandchildren,
    } = child;
    let role = prioritize_role(&parent, &child_node);
    let text = prioritize_text(&parent.text, &child_node.text);
    let child_priority = match (parent.id.is_some(), child_node.id.is_some()) {
        (_, true) => true,
        (true, false) => false,
        (false, false) => !matches!(
            child_node.role.category(),
            NodeCategory::List | NodeCategory::Structural
        ),
    };
    let mut merged = if child_priority { child_node } else { parent };
    merged.role = role;
    merged.text = text;
    Folded {
        node: merged,
        children: grandchildren,
    }
}

/// Pick the role of a merged pair.
///
/// Equal roles stand. Low-priority roles yield to the other side; two
/// low-priority roles collapse to `group`. Among informative roles,
/// container roles (`listitem`, `paragraph`, `main`) yield to their
/// content, generic content roles (`list`, `paragraph`) yield to a
/// specific container, an id-bearing side keeps its role, and on a
/// true tie the child wins as the more specific of the two.
fn prioritize_role(parent: &DomNode, child: &DomNode) -> Role {
    let parent_role = parent.role.as_str();
    let child_role = child.role.as_str();
    if parent_role == child_role {
        return parent.role.clone();
    }
    let parent_low = LOW_PRIORITY_ROLES.contains(&parent_role);
    let child_low = LOW_PRIORITY_ROLES.contains(&child_role);
    match (parent_low, child_low) {
        (true, true) => Role::Known(NodeRole::Group),
        (true, false) => child.role.clone(),
        (false, true) => parent.role.clone(),
        (false, false) => {
            if matches!(parent_role, "listitem" | "paragraph" | "main") {
                return child.role.clone();
            }
            if matches!(child_role, "list" | "paragraph") {
                return parent.role.clone();
            }
            if child.id.is_some() {
                return child.role.clone();
            }
            if parent.id.is_some() {
                return parent.role.clone();
            }
            child.role.clone()
        }
    }
}

/// Combine the texts of a merged pair: containment deduplicates, anything
/// else concatenates.
fn prioritize_text(parent: &str, child: &str) -> String {
    let parent = parent.trim();
    let child = child.trim();
    if parent.is_empty() {
        return child.to_string();
    }
    if child.is_empty() {
        return parent.to_string();
    }
    if parent.contains(child) {
        parent.to_string()
    } else if child.contains(parent) {
        child.to_string()
    } else {
        format!("{parent} {child}")
    }
}

fn push_folded(folded: Folded, assembler: &mut TreeAssembler) -> NodeId {
    let Folded { mut node, children } = folded;
    node.children = children
        .into_iter()
        .map(|child| push_folded(child, assembler))
        .collect();
    assembler.push(node)
}
