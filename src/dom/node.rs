//! Immutable DOM tree model
//!
//! The tree is an arena of immutable nodes addressed by index, with a
//! separate index→parent map populated in a post-construction fix-up
//! pass. This keeps nodes freely shareable while still supporting the
//! parent walks needed for text aggregation and shadow-DOM resolution.
//!
//! Trees are built fresh per snapshot and never mutated; reduction and
//! filtering return new trees. Ids are valid only within the snapshot
//! generation that produced them.

use crate::dom::attributes::DomAttributes;
use crate::dom::role::{NodeCategory, NodeKind, Role};
use crate::error::{InvariantError, Result};
use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;

/// Index of a node within its [`DomTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index of this node
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Locator strategies for one node, precomputed at build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selectors {
    /// CSS selector derived from the xpath plus safe attributes
    pub css_selector: String,
    /// Raw xpath from the in-page evaluator
    pub xpath_selector: String,
    /// Synthetic path: page URL plus a structural hash chained through
    /// ancestors; unique per node within a snapshot (best effort, no
    /// collision guard)
    pub synthetic_selector: String,
    /// CSS paths of enclosing iframes, ordered outer→inner
    pub iframe_parent_css_selectors: Vec<String>,
    /// Whether the node lives inside an iframe
    pub in_iframe: bool,
    /// Whether the node lives inside a shadow root
    pub in_shadow_root: bool,
}

/// Flags and locator data computed by the in-page evaluator and the builder
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComputedAttributes {
    /// Whether the element is inside the viewport
    pub in_viewport: bool,
    /// Whether the element is interactive
    pub is_interactive: bool,
    /// Whether the element is the topmost at its position
    pub is_top_element: bool,
    /// Whether the element accepts text input
    pub is_editable: bool,
    /// Whether the element hosts a shadow root
    pub shadow_root: bool,
    /// Highlight index assigned by the evaluator to interactive elements
    pub highlight_index: Option<u32>,
    /// Precomputed locator strategies
    pub selectors: Option<Selectors>,
}

/// One immutable node of a [`DomTree`]
#[derive(Debug, Clone, Serialize)]
pub struct DomNode {
    /// Short role-typed id, present only for addressable nodes
    pub id: Option<String>,
    /// Coarse node kind
    pub kind: NodeKind,
    /// Accessibility role
    pub role: Role,
    /// Own or aggregated label
    pub text: String,
    /// Ordered children (arena indices)
    pub children: Vec<NodeId>,
    /// Normalized attributes; absent for text leaves
    pub attributes: Option<DomAttributes>,
    /// Computed flags and selectors
    pub computed: ComputedAttributes,
    /// Own id plus the union of all descendant ids, precomputed for
    /// O(depth) subset tests
    pub(crate) subtree_ids: Vec<String>,
}

impl DomNode {
    /// Ids addressable from this node's subtree (own id included)
    pub fn subtree_ids(&self) -> &[String] {
        &self.subtree_ids
    }

    /// String form of the role
    pub fn role_str(&self) -> &str {
        self.role.as_str()
    }

    /// Whether this node is addressable: interaction category with an id
    pub fn is_interaction(&self) -> bool {
        if self.id.is_none() {
            return false;
        }
        self.kind == NodeKind::Interaction || self.role.category() == NodeCategory::Interaction
    }

    /// Whether this node is image-like
    pub fn is_image(&self) -> bool {
        self.role.category() == NodeCategory::Image
    }
}

/// The addressable view of an interaction node.
///
/// By construction it carries a non-null id and no children; its text is
/// the aggregated inner text of the underlying subtree.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionNode {
    /// Short role-typed id (`B1`, `L3`, ...)
    pub id: String,
    /// Accessibility role
    pub role: Role,
    /// Aggregated text label
    pub text: String,
    /// Normalized attributes
    pub attributes: Option<DomAttributes>,
    /// Computed flags and selectors
    pub computed: ComputedAttributes,
    /// Arena index of the underlying node, for ancestor walks
    #[serde(skip)]
    pub node: NodeId,
}

/// An immutable snapshot tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<DomNode>,
    parents: Vec<Option<NodeId>>,
    root: NodeId,
    page_url: String,
}

/// Incremental arena builder. Nodes are pushed bottom-up (children
/// first) so `subtree_ids` can be computed as each node lands.
#[derive(Debug, Default)]
pub(crate) struct TreeAssembler {
    nodes: Vec<DomNode>,
}

impl TreeAssembler {
    pub(crate) fn push(&mut self, mut node: DomNode) -> NodeId {
        let mut subtree_ids: Vec<String> = Vec::new();
        if let Some(id) = &node.id {
            subtree_ids.push(id.clone());
        }
        for child in &node.children {
            subtree_ids.extend(self.nodes[child.index()].subtree_ids.iter().cloned());
        }
        node.subtree_ids = subtree_ids;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Seal the arena: run the parent fix-up pass and freeze the tree
    pub(crate) fn seal(self, root: NodeId, page_url: String) -> DomTree {
        let mut parents: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for child in &node.children {
                parents[child.index()] = Some(NodeId(index as u32));
            }
        }
        DomTree {
            nodes: self.nodes,
            parents,
            root,
            page_url,
        }
    }
}

impl DomTree {
    /// The root node id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The page URL this tree was built from
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// Access a node by arena index
    pub fn node(&self, id: NodeId) -> &DomNode {
        &self.nodes[id.index()]
    }

    /// Parent of a node, from the post-construction fix-up map
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.index()]
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty (never true for a sealed tree)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the node carrying the given short id
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
            .map(|index| NodeId(index as u32))
    }

    /// Depth-first flatten of the subtree at `root`, keeping nodes that
    /// pass the filter
    pub fn flatten(&self, root: NodeId, keep: impl Fn(&DomNode) -> bool) -> Vec<NodeId> {
        let mut acc = Vec::new();
        self.flatten_rec(root, &keep, &mut acc);
        acc
    }

    fn flatten_rec(&self, id: NodeId, keep: &impl Fn(&DomNode) -> bool, acc: &mut Vec<NodeId>) {
        if keep(self.node(id)) {
            acc.push(id);
        }
        for child in &self.node(id).children {
            self.flatten_rec(*child, keep, acc);
        }
    }

    /// The addressable view of one node.
    ///
    /// Fails with an invariant violation if the node is not an
    /// interaction node or lacks an id — both signal upstream bugs.
    pub fn interaction_node(&self, id: NodeId) -> Result<InteractionNode> {
        let node = self.node(id);
        let Some(node_id) = node.id.clone() else {
            return Err(InvariantError::InteractionWithoutId {
                role: node.role_str().to_string(),
                text: node.text.clone(),
            }
            .into());
        };
        if !node.is_interaction() {
            return Err(InvariantError::NotAnInteractionNode {
                id: node_id,
                role: node.role_str().to_string(),
            }
            .into());
        }
        Ok(InteractionNode {
            id: node_id,
            role: node.role.clone(),
            text: self.inner_text(id),
            attributes: node.attributes.clone(),
            computed: node.computed.clone(),
            node: id,
        })
    }

    /// All addressable nodes of the tree, in document order
    pub fn interaction_nodes(&self) -> Result<Vec<InteractionNode>> {
        self.flatten(self.root, |node| node.is_interaction())
            .into_iter()
            .map(|id| self.interaction_node(id))
            .collect()
    }

    /// Ids of all addressable nodes, in document order
    pub fn interaction_ids(&self) -> Vec<String> {
        self.flatten(self.root, |node| node.is_interaction())
            .into_iter()
            .filter_map(|id| self.node(id).id.clone())
            .collect()
    }

    /// All image-like nodes of the tree
    pub fn image_nodes(&self) -> Vec<NodeId> {
        self.flatten(self.root, |node| node.is_image())
    }

    /// Aggregated visible text under a node.
    ///
    /// Inputs fall back to their placeholder; hidden, invisible and
    /// disabled children are skipped.
    pub fn inner_text(&self, id: NodeId) -> String {
        let node = self.node(id);
        if let Some(attrs) = &node.attributes {
            if attrs.tag_name == "input" {
                if !node.text.is_empty() {
                    return node.text.clone();
                }
                return attrs.placeholder.clone().unwrap_or_default();
            }
        }
        if node.kind == NodeKind::Text {
            return node.text.clone();
        }
        let mut texts: Vec<String> = Vec::new();
        for child in &node.children {
            let child_node = self.node(*child);
            if let Some(attrs) = &child_node.attributes {
                if attrs.hidden == Some(true)
                    || attrs.visible == Some(false)
                    || attrs.enabled == Some(false)
                {
                    continue;
                }
            }
            let child_text = self.inner_text(*child);
            if !child_text.is_empty() {
                texts.push(child_text);
            }
        }
        if texts.is_empty() {
            // folded or label-only nodes carry their text on the node
            // itself rather than in child leaves
            return node.text.clone();
        }
        texts.join(" ")
    }

    /// Rebuild the tree keeping only subtrees whose nodes pass the
    /// predicate. A surviving node with no id, no surviving children and
    /// empty text is dropped as well. Returns `None` when nothing
    /// survives.
    pub fn subtree_filter(&self, pred: impl Fn(&DomNode) -> bool) -> Option<DomTree> {
        let mut assembler = TreeAssembler::default();
        let root = self.filter_rec(self.root, &pred, &mut assembler)?;
        Some(assembler.seal(root, self.page_url.clone()))
    }

    fn filter_rec(
        &self,
        id: NodeId,
        pred: &impl Fn(&DomNode) -> bool,
        assembler: &mut TreeAssembler,
    ) -> Option<NodeId> {
        let node = self.node(id);
        if !pred(node) {
            return None;
        }
        let mut children = Vec::new();
        for child in &node.children {
            if let Some(kept) = self.filter_rec(*child, pred, assembler) {
                children.push(kept);
            }
        }
        if node.id.is_none() && children.is_empty() && node.text.trim().is_empty() {
            return None;
        }
        Some(assembler.push(DomNode {
            children,
            subtree_ids: Vec::new(),
            ..node.clone()
        }))
    }

    /// Drop every node whose role is in the given set.
    ///
    /// Unlike [`DomTree::subtree_filter`], an empty result is an error:
    /// callers of this operation always expect a non-empty tree.
    pub fn subtree_without(&self, roles: &HashSet<&str>) -> Result<DomTree> {
        self.subtree_filter(|node| match &node.role {
            Role::Raw(_) => true,
            Role::Known(known) => !roles.contains(known.as_str()),
        })
        .ok_or_else(|| {
            InvariantError::EmptyFilterResult {
                operation: format!("subtree_without(roles={roles:?})"),
            }
            .into()
        })
    }

    /// Serializable nested view (role/id/text/children/attributes) for
    /// downstream renderers
    pub fn to_value(&self) -> serde_json::Value {
        self.node_value(self.root)
    }

    fn node_value(&self, id: NodeId) -> serde_json::Value {
        let node = self.node(id);
        let mut value = json!({ "role": node.role.as_str() });
        let object = value.as_object_mut().expect("json! object");
        if let Some(node_id) = &node.id {
            object.insert("id".to_string(), json!(node_id));
        }
        if !node.text.is_empty() {
            object.insert("text".to_string(), json!(node.text));
        }
        if let Some(attrs) = &node.attributes {
            let relevant = attrs.relevant_attrs(None, None);
            if !relevant.is_empty() {
                object.insert("attributes".to_string(), serde_json::Value::Object(relevant));
            }
        }
        if !node.children.is_empty() {
            let children: Vec<serde_json::Value> = node
                .children
                .iter()
                .map(|child| self.node_value(*child))
                .collect();
            object.insert("children".to_string(), json!(children));
        }
        value
    }
}
