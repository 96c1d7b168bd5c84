//! Shadow-DOM selector chains
//!
//! XPaths computed by the in-page evaluator are relative to the nearest
//! shadow root, so a node behind one or more shadow boundaries cannot be
//! reached with a single expression. This walks the ancestor chain and
//! emits an `" >> "`-joined fragment per boundary, ordered root→leaf,
//! the way frame-piercing locator engines expect.

use crate::dom::node::{DomNode, DomTree, NodeId, Selectors};
use crate::error::{InvariantError, Result};
use tracing::warn;

fn node_label(node: &DomNode) -> String {
    node.id
        .clone()
        .unwrap_or_else(|| node.role_str().to_string())
}

/// Rewrite a node's selectors into a shadow-piercing xpath chain.
///
/// Each shadow host on the path contributes one fragment; the fragment
/// below a host is stripped of the host's own xpath, since evaluator
/// xpaths can embed the host path. A host with an empty xpath degrades
/// to its bare tag name, with a warning.
pub(crate) fn selectors_through_shadow_dom(tree: &DomTree, id: NodeId) -> Result<Selectors> {
    let node = tree.node(id);
    let Some(base) = node.computed.selectors.clone() else {
        return Err(InvariantError::MissingSelectors {
            id: node_label(node),
        }
        .into());
    };

    let mut fragments = vec![format!("xpath={}", base.xpath_selector)];
    let mut current = id;
    while let Some(parent) = tree.parent(current) {
        let host = tree.node(current);
        if host.computed.shadow_root {
            let Some(host_selectors) = &host.computed.selectors else {
                return Err(InvariantError::MissingSelectors {
                    id: node_label(host),
                }
                .into());
            };
            if host_selectors.xpath_selector.is_empty() {
                let tag = host
                    .attributes
                    .as_ref()
                    .map(|attrs| attrs.tag_name.clone())
                    .unwrap_or_else(|| "*".to_string());
                warn!(
                    host = node_label(host),
                    tag, "shadow host has an empty xpath, using its tag name"
                );
                fragments.push(tag);
            } else {
                if let Some(last) = fragments.last_mut() {
                    *last = last.replace(&host_selectors.xpath_selector, "");
                }
                fragments.push(format!("xpath={}", host_selectors.xpath_selector));
            }
        }
        current = parent;
    }

    fragments.reverse();
    Ok(Selectors {
        xpath_selector: fragments.join(" >> "),
        ..base
    })
}
