//! Symbolic→concrete action resolution
//!
//! Binds a submitted action to the current snapshot: the target node is
//! looked up by short id, its selectors are resolved (through the
//! shadow chain when needed) and the step role picks the concrete
//! action type. Resolution is pure; nothing here talks to a browser.

use crate::action::types::{ActionRole, ActionTarget, ConcreteAction, StepAction, SymbolicAction};
use crate::dom::node::{DomTree, InteractionNode};
use crate::error::{ActionError, Result};
use crate::locator::resolve_selectors;
use tracing::{debug, instrument};

/// Resolves symbolic actions against a snapshot tree
pub struct ActionResolver;

impl ActionResolver {
    /// Resolve a symbolic action against the given snapshot tree.
    ///
    /// Browser actions pass through untouched; step actions are bound
    /// to their target node or rejected with a caller-actionable error.
    #[instrument(skip(action, tree), fields(url = tree.page_url()))]
    pub fn resolve(action: &SymbolicAction, tree: &DomTree) -> Result<ConcreteAction> {
        match action {
            SymbolicAction::Browser(browser) => Ok(ConcreteAction::Browser {
                action: browser.clone(),
            }),
            SymbolicAction::Step(step) => Self::resolve_step(step, tree),
        }
    }

    fn resolve_step(step: &StepAction, tree: &DomTree) -> Result<ConcreteAction> {
        let Some(node_id) = tree.find(&step.id) else {
            return Err(ActionError::UnknownActionId {
                id: step.id.clone(),
            }
            .into());
        };
        let node = tree.interaction_node(node_id)?;
        let selectors = resolve_selectors(tree, node_id)?;
        let target = ActionTarget {
            id: node.id.clone(),
            text_label: node.text.clone(),
            selectors,
            press_enter: step.press_enter,
        };

        let role = Self::step_role(step)?;
        debug!(id = step.id, role = %role, "resolving step action");
        match role {
            ActionRole::Button | ActionRole::Link | ActionRole::Image | ActionRole::Misc => {
                Ok(ConcreteAction::Click { target })
            }
            ActionRole::Option => Ok(ConcreteAction::SelectDropdownOption {
                value: node.id.clone(),
                target,
            }),
            ActionRole::Input => Self::resolve_input(step, &node, target),
        }
    }

    /// The step's role, explicit or derived from the id prefix
    fn step_role(step: &StepAction) -> Result<ActionRole> {
        if let Some(role) = step.role {
            return Ok(role);
        }
        step.id
            .chars()
            .next()
            .and_then(ActionRole::from_id_prefix)
            .ok_or_else(|| {
                ActionError::UnknownActionRole {
                    role: step.id.chars().next().unwrap_or('?').to_string(),
                    id: step.id.clone(),
                }
                .into()
            })
    }

    /// Dispatch an input step on the target's accessibility role.
    ///
    /// Text inputs and anything editable fill; checkboxes check with a
    /// parsed boolean; comboboxes select; everything else falls back to
    /// fill, which matches how exotic input widgets actually behave.
    fn resolve_input(
        step: &StepAction,
        node: &InteractionNode,
        target: ActionTarget,
    ) -> Result<ConcreteAction> {
        let Some(value) = &step.value else {
            return Err(ActionError::MissingParameter {
                id: step.id.clone(),
            }
            .into());
        };
        let value = value.clone();
        if node.role.as_str() == "textbox" || node.computed.is_editable {
            return Ok(ConcreteAction::Fill { target, value });
        }
        match node.role.as_str() {
            "checkbox" => Ok(ConcreteAction::Check {
                value: parse_boolean(&value)?,
                target,
            }),
            "combobox" => Ok(ConcreteAction::SelectDropdownOption { target, value }),
            _ => Ok(ConcreteAction::Fill { target, value }),
        }
    }
}

/// Parse an agent-submitted boolean: `true/1/yes/on` and
/// `false/0/no/off`, case-insensitive
pub fn parse_boolean(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ActionError::InvalidBoolean {
            value: value.to_string(),
        }
        .into()),
    }
}
