//! Sequential short-id assignment
//!
//! Walks the parsed tree depth-first and hands every highlighted
//! interactive element a compact id of the form `{prefix}{counter}`,
//! where the prefix encodes
//! the element's role family (`L`ink, `B`utton, `I`nput, `F`igure,
//! `O`ption) and each family counts from 1 in document order.

use crate::dom::builder::ParsedNode;
use crate::dom::role::Role;
use std::collections::HashMap;
use tracing::debug;

/// Assign short ids to every highlighted interactive element, in
/// document order.
pub(crate) fn assign_sequential_ids(root: &mut ParsedNode) {
    let mut counters: HashMap<char, u32> = HashMap::new();
    let mut stack: Vec<&mut ParsedNode> = vec![root];
    while let Some(node) = stack.pop() {
        if let ParsedNode::Element(element) = node {
            // only highlighted interactive elements are addressable; an
            // interactive node the evaluator never highlighted stays
            // id-less and does not advance any counter
            if element.is_interactive && element.highlight_index.is_some() {
                let role = Role::from_value(&element.role);
                if let Some(prefix) = role.id_prefix(true) {
                    let counter = counters.entry(prefix).or_insert(0);
                    *counter += 1;
                    element.assigned_id = Some(format!("{prefix}{counter}"));
                } else {
                    debug!(
                        role = element.role,
                        tag = element.tag_name,
                        "interactive element left without an id"
                    );
                }
            }
            // reversed push keeps document order on a pop-based stack
            stack.extend(element.children.iter_mut().rev());
        }
    }
}
