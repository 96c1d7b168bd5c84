//! Property-based testing for the DOM pipeline.
//!
//! Uses proptest to generate arbitrary raw snapshots and verify the
//! engine's structural invariants: builds never panic, ids are unique
//! and role-typed, reduction never loses an addressable node and is
//! idempotent, and selector construction is total.

use domgraph::dom::{build_csspath, RawDomNode, TreeBuilder, TreeReducer};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

// ============================================================================
// STRATEGIES FOR RAW SNAPSHOT TREES
// ============================================================================

/// Strategy for element tag names the evaluator commonly emits
pub fn arb_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("div".to_string()),
        Just("span".to_string()),
        Just("button".to_string()),
        Just("a".to_string()),
        Just("input".to_string()),
        Just("select".to_string()),
        Just("ul".to_string()),
        Just("li".to_string()),
        Just("img".to_string()),
        "[a-z]{2,8}-[a-z]{2,8}",
    ]
}

/// Strategy for attribute maps, mixing safe, unsafe and hostile values
pub fn arb_attributes() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map(
        prop_oneof![
            Just("class".to_string()),
            Just("id".to_string()),
            Just("name".to_string()),
            Just("type".to_string()),
            Just("href".to_string()),
            Just("aria-label".to_string()),
            Just("onclick".to_string()),
            "[a-z-]{1,12}",
        ],
        ".{0,30}",
        0..5,
    )
}

/// Strategy for text leaves
pub fn arb_text_node() -> impl Strategy<Value = RawDomNode> {
    (".{0,30}", any::<bool>()).prop_map(|(text, is_visible)| RawDomNode {
        node_type: "TEXT_NODE".to_string(),
        text,
        is_visible,
        ..RawDomNode::default()
    })
}

fn element_from(
    tag: String,
    index: u8,
    attributes: HashMap<String, String>,
    interactive: bool,
    children: Vec<RawDomNode>,
) -> RawDomNode {
    RawDomNode {
        node_type: "ELEMENT_NODE".to_string(),
        tag_name: Some(tag.clone()),
        xpath: Some(format!("/html/body/{tag}[{index}]")),
        attributes,
        is_visible: true,
        is_interactive: interactive,
        highlight_index: if interactive { Some(index as u32) } else { None },
        children,
        ..RawDomNode::default()
    }
}

/// Rewrite generated xpaths into consistent, sibling-unique paths, the
/// way a real evaluator emits them
fn assign_unique_xpaths(node: &mut RawDomNode) {
    let parent_path = node.xpath.clone().unwrap_or_default();
    for (position, child) in node.children.iter_mut().enumerate() {
        if child.node_type != "TEXT_NODE" {
            let tag = child.tag_name.clone().unwrap_or_default();
            child.xpath = Some(format!("{}/{}[{}]", parent_path, tag, position + 1));
        }
        assign_unique_xpaths(child);
    }
}

/// Strategy for whole raw snapshots: an element root over a random tree
/// of elements and text leaves
pub fn arb_raw_tree() -> impl Strategy<Value = RawDomNode> {
    let leaf = prop_oneof![
        arb_text_node(),
        (arb_tag(), 1u8..9, arb_attributes(), any::<bool>()).prop_map(
            |(tag, index, attributes, interactive)| element_from(
                tag,
                index,
                attributes,
                interactive,
                Vec::new()
            )
        ),
    ];
    leaf.prop_recursive(4, 24, 4, |inner| {
        (
            arb_tag(),
            1u8..9,
            arb_attributes(),
            any::<bool>(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, index, attributes, interactive, children)| {
                element_from(tag, index, attributes, interactive, children)
            })
    })
    .prop_map(|node| {
        let mut root = RawDomNode {
            node_type: "ELEMENT_NODE".to_string(),
            tag_name: Some("body".to_string()),
            xpath: Some("/html/body".to_string()),
            is_visible: true,
            children: vec![node],
            ..RawDomNode::default()
        };
        assign_unique_xpaths(&mut root);
        root
    })
}

// ============================================================================
// PIPELINE INVARIANTS
// ============================================================================

proptest! {
    #[test]
    fn prop_build_succeeds_on_wellformed_input(raw in arb_raw_tree()) {
        let (tree, _diagnostics) = TreeBuilder::build(&raw, "https://example.com").unwrap();
        prop_assert!(tree.len() >= 1);
    }

    #[test]
    fn prop_ids_are_unique_and_role_typed(raw in arb_raw_tree()) {
        let (tree, _) = TreeBuilder::build(&raw, "https://example.com").unwrap();
        let ids = tree.interaction_ids();
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len(), "duplicate ids: {:?}", ids);

        for node in tree.interaction_nodes().unwrap() {
            let prefix = node.id.chars().next().unwrap();
            prop_assert!("LBIFOM".contains(prefix), "unexpected prefix in {}", node.id);
            prop_assert_eq!(node.role.id_prefix(true), Some(prefix));
            prop_assert!(node.id[1..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn prop_reduce_preserves_addressable_nodes(raw in arb_raw_tree()) {
        let (tree, _) = TreeBuilder::build(&raw, "https://example.com").unwrap();
        let reduced = TreeReducer::reduce(&tree);
        prop_assert_eq!(tree.interaction_ids(), reduced.interaction_ids());
        prop_assert!(reduced.len() <= tree.len());
    }

    #[test]
    fn prop_reduce_is_idempotent(raw in arb_raw_tree()) {
        let (tree, _) = TreeBuilder::build(&raw, "https://example.com").unwrap();
        let once = TreeReducer::reduce(&tree);
        let twice = TreeReducer::reduce(&once);
        prop_assert_eq!(once.len(), twice.len());
        prop_assert_eq!(once.interaction_ids(), twice.interaction_ids());
    }

    #[test]
    fn prop_synthetic_selectors_unique_per_element(raw in arb_raw_tree()) {
        let (tree, _) = TreeBuilder::build(&raw, "https://example.com").unwrap();
        let mut seen: HashSet<String> = HashSet::new();
        for node in tree.interaction_nodes().unwrap() {
            if let Some(selectors) = &node.computed.selectors {
                seen.insert(selectors.synthetic_selector.clone());
            }
        }
        prop_assert_eq!(seen.len(), tree.interaction_ids().len());
    }
}

// ============================================================================
// SELECTOR CONSTRUCTION IS TOTAL
// ============================================================================

proptest! {
    #[test]
    fn prop_csspath_never_panics(
        tag in arb_tag(),
        xpath in "(/[a-z]{1,6}(\\[[0-9]{1,2}\\])?){0,5}",
        attributes in arb_attributes(),
        highlight in prop::option::of(0u32..50),
    ) {
        let css = build_csspath(&tag, &xpath, &attributes, highlight, true);
        prop_assert!(!css.is_empty());
    }

    #[test]
    fn prop_csspath_handles_hostile_values(value in ".{0,30}") {
        let mut attributes = HashMap::new();
        attributes.insert("aria-label".to_string(), value.clone());
        let css = build_csspath("button", "/html/body/button", &attributes, None, true);
        prop_assert!(css.starts_with("html > body > button"));
        // control characters never survive into the selector
        prop_assert!(!css.contains('\n') && !css.contains('\r') && !css.contains('\t'));
        if value.chars().any(|c| "\"'<>`\n\r\t".contains(c)) {
            prop_assert!(css.contains("*="));
        }
    }
}
