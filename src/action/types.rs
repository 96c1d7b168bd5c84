//! Action vocabulary
//!
//! Agents submit symbolic actions: either node-independent browser
//! actions or a [`StepAction`] addressing a node by short id. The
//! resolver turns these into [`ConcreteAction`]s carrying everything an
//! executor needs (selectors, label, typed value) so execution never
//! touches the tree again.

use crate::dom::node::Selectors;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse role of a step action, either stated by the agent or derived
/// from the id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionRole {
    /// Follows a link (`L` ids)
    Link,
    /// Clicks a button-like control (`B` ids)
    Button,
    /// Fills, checks or selects an input (`I` ids)
    Input,
    /// Clicks an image (`F` ids)
    Image,
    /// Selects a dropdown option (`O` ids)
    Option,
    /// Clicks an element with no specific role mapping (`M` ids)
    Misc,
}

impl ActionRole {
    /// Derive the role from a short-id prefix character
    pub fn from_id_prefix(prefix: char) -> Option<ActionRole> {
        match prefix {
            'L' => Some(ActionRole::Link),
            'B' => Some(ActionRole::Button),
            'I' => Some(ActionRole::Input),
            'F' => Some(ActionRole::Image),
            'O' => Some(ActionRole::Option),
            'M' => Some(ActionRole::Misc),
            _ => None,
        }
    }

    /// String form of the role
    pub fn as_str(self) -> &'static str {
        match self {
            ActionRole::Link => "link",
            ActionRole::Button => "button",
            ActionRole::Input => "input",
            ActionRole::Image => "image",
            ActionRole::Option => "option",
            ActionRole::Misc => "misc",
        }
    }
}

impl fmt::Display for ActionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbolic step submitted by an agent, addressing a node by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepAction {
    /// Short id of the target node (`B1`, `I2`, ...)
    pub id: String,
    /// Role override; derived from the id prefix when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ActionRole>,
    /// Parameter for fill/check/select steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Whether to press Enter after the step completes
    #[serde(default)]
    pub press_enter: bool,
}

/// Node-independent browser actions; these resolve to themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrowserAction {
    /// Navigate the current tab
    Goto {
        /// Target URL
        url: String,
    },
    /// Navigate in a new tab
    GotoNewTab {
        /// Target URL
        url: String,
    },
    /// History back
    GoBack,
    /// History forward
    GoForward,
    /// Reload the current page
    Reload,
    /// Wait for a fixed interval
    Wait {
        /// Milliseconds to wait
        duration_ms: u64,
    },
    /// Press a keyboard key
    PressKey {
        /// Key name, in the executor's convention
        key: String,
    },
    /// Scroll up
    ScrollUp {
        /// Pixels to scroll; executor default when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<u32>,
    },
    /// Scroll down
    ScrollDown {
        /// Pixels to scroll; executor default when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<u32>,
    },
    /// Switch to another tab
    SwitchTab {
        /// Zero-based tab index
        tab_index: usize,
    },
}

/// Any action an agent can submit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolicAction {
    /// Node-independent browser action
    Browser(BrowserAction),
    /// Node-addressed step
    Step(StepAction),
}

/// Target binding shared by all node-bound concrete actions
#[derive(Debug, Clone, Serialize)]
pub struct ActionTarget {
    /// Short id of the target node
    pub id: String,
    /// Human-readable label of the target, for logs and traces
    pub text_label: String,
    /// Resolved selectors (shadow-piercing when needed)
    pub selectors: Selectors,
    /// Whether to press Enter afterwards
    pub press_enter: bool,
}

/// A fully resolved action, ready for an executor
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConcreteAction {
    /// Click the target
    Click {
        /// Resolved target
        target: ActionTarget,
    },
    /// Fill the target with a text value
    Fill {
        /// Resolved target
        target: ActionTarget,
        /// Text to type
        value: String,
    },
    /// Set the target's checked state
    Check {
        /// Resolved target
        target: ActionTarget,
        /// Desired checked state
        value: bool,
    },
    /// Select a dropdown option on the target
    SelectDropdownOption {
        /// Resolved target
        target: ActionTarget,
        /// Option value or short id of the option node
        value: String,
    },
    /// Fill a multi-factor credential field; produced by credential
    /// handling layers, never by id-based resolution
    MultiFactorFill {
        /// Resolved target
        target: ActionTarget,
        /// One-time code to type
        value: String,
    },
    /// Fill via keyboard fallback when regular fill is rejected;
    /// produced by credential handling layers, never by id-based
    /// resolution
    FallbackFill {
        /// Resolved target
        target: ActionTarget,
        /// Text to type
        value: String,
    },
    /// Pass-through browser action
    Browser {
        /// The original browser action
        action: BrowserAction,
    },
}

impl ConcreteAction {
    /// The resolved target, for node-bound actions
    pub fn target(&self) -> Option<&ActionTarget> {
        match self {
            ConcreteAction::Click { target }
            | ConcreteAction::Fill { target, .. }
            | ConcreteAction::Check { target, .. }
            | ConcreteAction::SelectDropdownOption { target, .. }
            | ConcreteAction::MultiFactorFill { target, .. }
            | ConcreteAction::FallbackFill { target, .. } => Some(target),
            ConcreteAction::Browser { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_prefix() {
        assert_eq!(ActionRole::from_id_prefix('L'), Some(ActionRole::Link));
        assert_eq!(ActionRole::from_id_prefix('I'), Some(ActionRole::Input));
        assert_eq!(ActionRole::from_id_prefix('M'), Some(ActionRole::Misc));
        assert_eq!(ActionRole::from_id_prefix('X'), None);
    }

    #[test]
    fn test_step_action_deserializes_with_defaults() {
        let step: StepAction = serde_json::from_str(r#"{"id": "B1"}"#).unwrap();
        assert_eq!(step.id, "B1");
        assert!(step.role.is_none());
        assert!(step.value.is_none());
        assert!(!step.press_enter);
    }

    #[test]
    fn test_browser_action_round_trip() {
        let action = BrowserAction::Goto {
            url: "https://example.com".to_string(),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"goto\""));
        let back: BrowserAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_symbolic_action_untagged() {
        let step: SymbolicAction =
            serde_json::from_str(r#"{"id": "I1", "value": "hello"}"#).unwrap();
        assert!(matches!(step, SymbolicAction::Step(_)));
        let browser: SymbolicAction = serde_json::from_str(r#"{"type": "go_back"}"#).unwrap();
        assert!(matches!(
            browser,
            SymbolicAction::Browser(BrowserAction::GoBack)
        ));
    }
}
