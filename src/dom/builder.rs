//! Raw tree parsing and immutable tree construction
//!
//! Converts the nested record produced by the in-page evaluator into an
//! immutable [`DomTree`]: CSS paths and synthetic selectors are computed
//! per element, iframe and shadow-root ancestry is threaded strictly
//! top-down, short ids are assigned, and the arena is sealed with the
//! parent fix-up pass. Attribute findings are returned alongside the
//! tree as [`Diagnostics`].

use crate::dom::attributes::{Diagnostics, DomAttributes};
use crate::dom::csspath::build_csspath;
use crate::dom::ids::assign_sequential_ids;
use crate::dom::node::{ComputedAttributes, DomNode, DomTree, NodeId, Selectors, TreeAssembler};
use crate::dom::role::{element_role, NodeCategory, NodeKind, Role};
use crate::error::{BuildError, Result};
use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tracing::instrument;

/// Raw per-node record as produced by the in-page evaluator
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDomNode {
    /// Node type; `"TEXT_NODE"` marks a text leaf
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Text content (text leaves only)
    #[serde(default)]
    pub text: String,
    /// Element tag name; absent for text leaves and degenerate nodes
    #[serde(default)]
    pub tag_name: Option<String>,
    /// XPath from the nearest root (document, iframe or shadow root)
    #[serde(default)]
    pub xpath: Option<String>,
    /// Raw attribute map
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Whether the node is visible
    #[serde(default)]
    pub is_visible: bool,
    /// Whether the node is interactive
    #[serde(default)]
    pub is_interactive: bool,
    /// Whether the node is the topmost element at its position
    #[serde(default)]
    pub is_top_element: bool,
    /// Whether the node accepts text input
    #[serde(default)]
    pub is_editable: bool,
    /// Highlight index assigned to interactive elements
    #[serde(default)]
    pub highlight_index: Option<u32>,
    /// Whether the element hosts a shadow root
    #[serde(default)]
    pub shadow_root: bool,
    /// Child records
    #[serde(default)]
    pub children: Vec<RawDomNode>,
}

/// Build-time tree; mutable only until id assignment completes
#[derive(Debug)]
pub(crate) enum ParsedNode {
    Text {
        text: String,
        is_visible: bool,
    },
    Element(Box<ParsedElement>),
}

#[derive(Debug)]
pub(crate) struct ParsedElement {
    pub(crate) tag_name: String,
    pub(crate) role: String,
    pub(crate) xpath: String,
    pub(crate) css_path: String,
    pub(crate) synthetic_selector: String,
    pub(crate) iframe_parent_css_selectors: Vec<String>,
    pub(crate) in_iframe: bool,
    pub(crate) in_shadow_root: bool,
    pub(crate) attributes: HashMap<String, String>,
    pub(crate) is_visible: bool,
    pub(crate) is_interactive: bool,
    pub(crate) is_top_element: bool,
    pub(crate) is_editable: bool,
    pub(crate) highlight_index: Option<u32>,
    pub(crate) shadow_root: bool,
    pub(crate) assigned_id: Option<String>,
    pub(crate) children: Vec<ParsedNode>,
}

fn stable_hash(value: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Converts raw evaluator records into sealed [`DomTree`] snapshots
pub struct TreeBuilder;

impl TreeBuilder {
    /// Build an immutable tree from a raw record.
    ///
    /// Fatal on malformed input (null tag with content, missing xpath)
    /// and on an empty root parse — the latter signals "retry after
    /// wait" to the caller. Per-node attribute problems degrade to the
    /// returned [`Diagnostics`] instead of aborting the build.
    #[instrument(skip(raw), fields(url = page_url))]
    pub fn build(raw: &RawDomNode, page_url: &str) -> Result<(DomTree, Diagnostics)> {
        let parsed = parse_node(raw, false, false, &[], page_url)?;
        let Some(mut parsed) = parsed else {
            return Err(BuildError::EmptyDomTree {
                url: page_url.to_string(),
            }
            .into());
        };
        assign_sequential_ids(&mut parsed);

        let mut diagnostics = Diagnostics::default();
        let mut assembler = TreeAssembler::default();
        let root = convert(&parsed, &mut assembler, &mut diagnostics);
        let tree = assembler.seal(root, page_url.to_string());
        diagnostics.log_summary();
        Ok((tree, diagnostics))
    }
}

/// Recursive parse of one raw record.
///
/// Iframe/shadow ancestry flows strictly top-down: children inherit and
/// extend the incoming context, never the reverse. Returns `Ok(None)`
/// only for the silently-dropped degenerate case (no tag, no xpath, no
/// attributes, no children).
fn parse_node(
    raw: &RawDomNode,
    in_iframe: bool,
    in_shadow_root: bool,
    iframe_parent_css_selectors: &[String],
    synthetic_parent: &str,
) -> Result<Option<ParsedNode>> {
    if raw.node_type == "TEXT_NODE" {
        return Ok(Some(ParsedNode::Text {
            text: raw.text.clone(),
            is_visible: raw.is_visible,
        }));
    }

    let Some(tag_name) = &raw.tag_name else {
        if raw.xpath.is_none() && raw.attributes.is_empty() && raw.children.is_empty() {
            return Ok(None);
        }
        return Err(BuildError::NullTagWithContent {
            context: format!(
                "xpath={:?}, attributes={}, children={}",
                raw.xpath,
                raw.attributes.len(),
                raw.children.len()
            ),
        }
        .into());
    };
    // some frameworks emit mangled custom-element tags; restore the dashes
    let tag_name = if let Some(stripped) = tag_name.strip_prefix("wiz_") {
        stripped.replace('_', "-")
    } else {
        tag_name.clone()
    };

    let Some(xpath) = &raw.xpath else {
        return Err(BuildError::MissingXpath {
            tag_name: tag_name.clone(),
        }
        .into());
    };

    let css_path = build_csspath(&tag_name, xpath, &raw.attributes, raw.highlight_index, true);
    let synthetic_selector = format!(
        "{}:{}:{}",
        synthetic_parent,
        stable_hash(xpath),
        stable_hash(&css_path)
    );

    let in_shadow_root = in_shadow_root || raw.shadow_root;
    let is_iframe = tag_name.eq_ignore_ascii_case("iframe");
    let in_iframe = in_iframe || is_iframe;
    let child_iframe_selectors: Vec<String> = if is_iframe {
        let mut extended = iframe_parent_css_selectors.to_vec();
        extended.push(css_path.clone());
        extended
    } else {
        iframe_parent_css_selectors.to_vec()
    };

    let mut children = Vec::new();
    for child in &raw.children {
        if let Some(parsed) = parse_node(
            child,
            in_iframe,
            in_shadow_root,
            &child_iframe_selectors,
            &synthetic_selector,
        )? {
            children.push(parsed);
        }
    }

    Ok(Some(ParsedNode::Element(Box::new(ParsedElement {
        role: element_role(&tag_name, &raw.attributes),
        tag_name,
        xpath: xpath.clone(),
        css_path,
        synthetic_selector,
        iframe_parent_css_selectors: iframe_parent_css_selectors.to_vec(),
        in_iframe,
        in_shadow_root,
        attributes: raw.attributes.clone(),
        is_visible: raw.is_visible,
        is_interactive: raw.is_interactive,
        is_top_element: raw.is_top_element,
        is_editable: raw.is_editable,
        highlight_index: raw.highlight_index,
        shadow_root: raw.shadow_root,
        assigned_id: None,
        children,
    }))))
}

/// Accessible-name computation for an element: explicit ARIA labeling
/// first, then standard labeling attributes, then visible text content
/// for labels and clickables, then resource URLs for media links.
fn element_name(element: &ParsedElement) -> String {
    let attrs = &element.attributes;
    if let Some(label) = attrs.get("aria-label") {
        if !label.is_empty() {
            return label.clone();
        }
    }
    for attr in ["name", "title", "alt", "placeholder", "value"] {
        if let Some(value) = attrs.get(attr) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    let tag = element.tag_name.to_ascii_lowercase();
    if matches!(tag.as_str(), "button" | "a" | "label") {
        let content = text_content(element);
        let trimmed = content.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    if matches!(tag.as_str(), "img" | "a") {
        if let Some(src) = attrs.get("src") {
            return src.clone();
        }
        if let Some(href) = attrs.get("href") {
            return href.clone();
        }
    }
    String::new()
}

/// Concatenated visible text of all descendant text leaves
fn text_content(element: &ParsedElement) -> String {
    let mut out = String::new();
    collect_text(&element.children, &mut out);
    out
}

fn collect_text(children: &[ParsedNode], out: &mut String) {
    for child in children {
        match child {
            ParsedNode::Text { text, is_visible } => {
                if *is_visible {
                    out.push_str(text);
                }
            }
            ParsedNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Bottom-up conversion of the parsed tree into arena nodes
fn convert(parsed: &ParsedNode, assembler: &mut TreeAssembler, diagnostics: &mut Diagnostics) -> NodeId {
    match parsed {
        ParsedNode::Text { text, is_visible } => assembler.push(DomNode {
            id: None,
            kind: NodeKind::Text,
            role: Role::from_value("text"),
            text: text.clone(),
            children: Vec::new(),
            attributes: None,
            computed: ComputedAttributes {
                in_viewport: *is_visible,
                ..ComputedAttributes::default()
            },
            subtree_ids: Vec::new(),
        }),
        ParsedNode::Element(element) => {
            let children: Vec<NodeId> = element
                .children
                .iter()
                .map(|child| convert(child, assembler, diagnostics))
                .collect();
            let role = Role::from_value(&element.role);
            let kind = if element.assigned_id.is_some() {
                NodeKind::Interaction
            } else if role.category() == NodeCategory::Image {
                NodeKind::Image
            } else {
                NodeKind::Other
            };
            let attributes =
                DomAttributes::normalize(&element.tag_name, &element.attributes, diagnostics);
            assembler.push(DomNode {
                id: element.assigned_id.clone(),
                kind,
                role,
                text: element_name(element),
                children,
                attributes: Some(attributes),
                computed: ComputedAttributes {
                    in_viewport: element.is_visible,
                    is_interactive: element.is_interactive,
                    is_top_element: element.is_top_element,
                    is_editable: element.is_editable,
                    shadow_root: element.shadow_root,
                    highlight_index: element.highlight_index,
                    selectors: Some(Selectors {
                        css_selector: element.css_path.clone(),
                        xpath_selector: element.xpath.clone(),
                        synthetic_selector: element.synthetic_selector.clone(),
                        iframe_parent_css_selectors: element.iframe_parent_css_selectors.clone(),
                        in_iframe: element.in_iframe,
                        in_shadow_root: element.in_shadow_root,
                    }),
                },
                subtree_ids: Vec::new(),
            })
        }
    }
}
