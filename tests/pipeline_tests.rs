//! End-to-end pipeline tests
//!
//! These tests run the whole processing chain on realistic raw
//! snapshots: build, reduce, resolve actions and diff, the way a
//! browser-agent runtime drives the engine.

use domgraph::action::{ActionResolver, ActionRole, ConcreteAction, StepAction, SymbolicAction};
use domgraph::dom::{diff_new_ids, RawDomNode, TreeBuilder, TreeReducer};
use domgraph::locator::resolve_selectors;
use domgraph::snapshot::{Snapshot, SnapshotMetadata, ViewportData};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;

fn build(value: serde_json::Value) -> domgraph::DomTree {
    let raw: RawDomNode = serde_json::from_value(value).unwrap();
    TreeBuilder::build(&raw, "https://example.com").unwrap().0
}

/// `<div><div><button class="cc!x">Submit</button></div></div>`
fn nested_button_page() -> serde_json::Value {
    json!({
        "type": "ELEMENT_NODE",
        "tagName": "body",
        "xpath": "/html/body",
        "isVisible": true,
        "children": [{
            "type": "ELEMENT_NODE",
            "tagName": "div",
            "xpath": "/html/body/div",
            "isVisible": true,
            "children": [{
                "type": "ELEMENT_NODE",
                "tagName": "div",
                "xpath": "/html/body/div/div",
                "isVisible": true,
                "children": [{
                    "type": "ELEMENT_NODE",
                    "tagName": "button",
                    "xpath": "/html/body/div/div/button",
                    "attributes": {"class": "cc!x"},
                    "isVisible": true,
                    "isInteractive": true,
                    "isTopElement": true,
                    "highlightIndex": 0,
                    "children": [{"type": "TEXT_NODE", "text": "Submit", "isVisible": true}]
                }]
            }]
        }]
    })
}

#[test]
fn test_nested_button_end_to_end() {
    let tree = build(nested_button_page());
    let reduced = TreeReducer::reduce(&tree);

    // exactly one addressable node survives, with its label
    assert_eq!(reduced.interaction_ids(), vec!["B1".to_string()]);
    let button = reduced.find("B1").unwrap();
    assert_eq!(reduced.inner_text(button), "Submit");

    // the invalid class token never leaks into the selector
    let selectors = resolve_selectors(&reduced, button).unwrap();
    assert!(selectors.css_selector.contains("button"));
    assert!(!selectors.css_selector.contains("cc!x"));

    // and the id resolves to a click
    let action: SymbolicAction = serde_json::from_str(r#"{"id": "B1"}"#).unwrap();
    let concrete = ActionResolver::resolve(&action, &reduced).unwrap();
    let ConcreteAction::Click { target } = concrete else {
        panic!("expected a click");
    };
    assert_eq!(target.id, "B1");
    assert_eq!(target.text_label, "Submit");
}

fn login_page() -> serde_json::Value {
    json!({
        "type": "ELEMENT_NODE",
        "tagName": "body",
        "xpath": "/html/body",
        "isVisible": true,
        "children": [{
            "type": "ELEMENT_NODE",
            "tagName": "form",
            "xpath": "/html/body/form",
            "isVisible": true,
            "children": [
                {
                    "type": "ELEMENT_NODE",
                    "tagName": "input",
                    "xpath": "/html/body/form/input[1]",
                    "attributes": {"type": "email", "placeholder": "Email", "name": "email"},
                    "isVisible": true,
                    "isInteractive": true,
                    "isEditable": true,
                    "highlightIndex": 0
                },
                {
                    "type": "ELEMENT_NODE",
                    "tagName": "input",
                    "xpath": "/html/body/form/input[2]",
                    "attributes": {"type": "password", "placeholder": "Password", "name": "password"},
                    "isVisible": true,
                    "isInteractive": true,
                    "isEditable": true,
                    "highlightIndex": 1
                },
                {
                    "type": "ELEMENT_NODE",
                    "tagName": "input",
                    "xpath": "/html/body/form/input[3]",
                    "attributes": {"type": "checkbox", "name": "remember"},
                    "isVisible": true,
                    "isInteractive": true,
                    "highlightIndex": 2
                },
                {
                    "type": "ELEMENT_NODE",
                    "tagName": "button",
                    "xpath": "/html/body/form/button",
                    "attributes": {"type": "submit"},
                    "isVisible": true,
                    "isInteractive": true,
                    "highlightIndex": 3,
                    "children": [{"type": "TEXT_NODE", "text": "Sign in", "isVisible": true}]
                },
                {
                    "type": "ELEMENT_NODE",
                    "tagName": "a",
                    "xpath": "/html/body/form/a",
                    "attributes": {"href": "/reset"},
                    "isVisible": true,
                    "isInteractive": true,
                    "highlightIndex": 4,
                    "children": [{"type": "TEXT_NODE", "text": "Forgot password?", "isVisible": true}]
                }
            ]
        }]
    })
}

#[test]
fn test_login_form_id_assignment() {
    let tree = build(login_page());
    assert_eq!(
        tree.interaction_ids(),
        vec![
            "I1".to_string(),
            "I2".to_string(),
            "B1".to_string(),
            "B2".to_string(),
            "L1".to_string()
        ]
    );
}

#[test]
fn test_login_form_fill_and_check() {
    let tree = build(login_page());

    let fill = SymbolicAction::Step(StepAction {
        id: "I1".to_string(),
        role: None,
        value: Some("user@example.com".to_string()),
        press_enter: false,
    });
    let ConcreteAction::Fill { value, target } = ActionResolver::resolve(&fill, &tree).unwrap()
    else {
        panic!("expected a fill");
    };
    assert_eq!(value, "user@example.com");
    // the name attribute outranks the placeholder in label computation
    assert_eq!(target.text_label, "email");

    let check = SymbolicAction::Step(StepAction {
        id: "B1".to_string(),
        role: Some(ActionRole::Input),
        value: Some("true".to_string()),
        press_enter: false,
    });
    let ConcreteAction::Check { value, .. } = ActionResolver::resolve(&check, &tree).unwrap()
    else {
        panic!("expected a check");
    };
    assert!(value);
}

#[test]
fn test_reduce_keeps_every_addressable_node() {
    let tree = build(login_page());
    let reduced = TreeReducer::reduce(&tree);
    assert_eq!(tree.interaction_ids(), reduced.interaction_ids());
}

#[test]
fn test_reduce_is_idempotent() {
    let tree = build(login_page());
    let once = TreeReducer::reduce(&tree);
    let twice = TreeReducer::reduce(&once);
    assert_eq!(once.len(), twice.len());
    assert_eq!(once.interaction_ids(), twice.interaction_ids());
}

#[test]
fn test_snapshot_diff_after_page_growth() {
    let before = build(nested_button_page());
    let after = build(login_page());

    let known: HashSet<String> = before.interaction_ids().into_iter().collect();
    let delta = diff_new_ids(&after, &known).unwrap();
    // B1 existed before; the rest of the form is new
    assert_eq!(
        delta.interaction_ids(),
        vec![
            "I1".to_string(),
            "I2".to_string(),
            "B2".to_string(),
            "L1".to_string()
        ]
    );
}

#[test]
fn test_snapshot_wrapper_comparison() {
    let metadata = SnapshotMetadata {
        title: "Login".to_string(),
        url: "https://www.example.com/login/".to_string(),
        viewport: ViewportData::default(),
        tabs: Vec::new(),
        timestamp: chrono::Utc::now(),
    };
    let a = Snapshot {
        metadata: metadata.clone(),
        tree: build(login_page()),
    };
    let b = Snapshot {
        metadata,
        tree: build(nested_button_page()),
    };
    assert_eq!(a.clean_url(), "example.com/login");
    assert!(a.same_interactions_as(&a.clone()));
    assert!(!a.same_interactions_as(&b));
}

#[test]
fn test_iframe_form_resolves_with_frame_chain() {
    let tree = build(json!({
        "type": "ELEMENT_NODE",
        "tagName": "body",
        "xpath": "/html/body",
        "isVisible": true,
        "children": [{
            "type": "ELEMENT_NODE",
            "tagName": "iframe",
            "xpath": "/html/body/iframe",
            "attributes": {"src": "https://pay.example.com"},
            "isVisible": true,
            "children": [{
                "type": "ELEMENT_NODE",
                "tagName": "input",
                "xpath": "/html/body/input",
                "attributes": {"type": "text", "name": "card"},
                "isVisible": true,
                "isInteractive": true,
                "isEditable": true,
                "highlightIndex": 0
            }]
        }]
    }));

    let input = tree.find("I1").unwrap();
    let selectors = resolve_selectors(&tree, input).unwrap();
    assert!(selectors.in_iframe);
    assert_eq!(selectors.iframe_parent_css_selectors.len(), 1);
    assert!(selectors.iframe_parent_css_selectors[0].contains("iframe"));
}

#[test]
fn test_shadow_dom_resolution_through_reduction() {
    let tree = build(json!({
        "type": "ELEMENT_NODE",
        "tagName": "body",
        "xpath": "/html/body",
        "isVisible": true,
        "children": [{
            "type": "ELEMENT_NODE",
            "tagName": "checkout-widget",
            "xpath": "/html/body/checkout-widget",
            "shadowRoot": true,
            "isVisible": true,
            "children": [{
                "type": "ELEMENT_NODE",
                "tagName": "button",
                "xpath": "/button",
                "isVisible": true,
                "isInteractive": true,
                "highlightIndex": 0,
                "children": [{"type": "TEXT_NODE", "text": "Pay", "isVisible": true}]
            }]
        }]
    }));

    let button = tree.find("B1").unwrap();
    let selectors = resolve_selectors(&tree, button).unwrap();
    assert!(selectors.in_shadow_root);
    assert_eq!(
        selectors.xpath_selector,
        "xpath=/html/body/checkout-widget >> xpath=/button"
    );
}
