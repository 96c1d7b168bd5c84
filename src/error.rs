//! Error types for DomGraph
//!
//! This module provides a comprehensive error type hierarchy using `thiserror`
//! for proper error handling across all components.
//!
//! Fatal errors come in three flavors: malformed input ([`BuildError`]),
//! internal invariant violations ([`InvariantError`]) and caller-actionable
//! resolution misses ([`ActionError`]). Soft failures (unknown attributes,
//! invalid class tokens, ambiguous selector matches) are logged and absorbed
//! locally; they never surface through these types.

use thiserror::Error;

/// The main error type for DomGraph operations
#[derive(Error, Debug)]
pub enum Error {
    /// Tree construction errors (malformed raw input)
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Internal invariant violations (upstream bug signals)
    #[error("Invariant error: {0}")]
    Invariant(#[from] InvariantError),

    /// Action resolution errors
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    /// Locator resolution errors
    #[error("Locator error: {0}")]
    Locator(#[from] LocatorError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building a tree from a raw page record.
///
/// All of these abort the current build; the caller decides whether to
/// retry on a fresh snapshot or abandon the step.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A node without a tag name carried attributes, an xpath or children
    #[error("Node has no tag name but carries content: {context}")]
    NullTagWithContent {
        /// Short description of the offending node
        context: String,
    },

    /// An element node arrived without an XPath
    #[error("XPath is missing for element <{tag_name}>")]
    MissingXpath {
        /// Tag name of the element missing its xpath
        tag_name: String,
    },

    /// The root parse produced no usable nodes; retry after a wait
    #[error("DOM tree is empty for {url}; the page may still be loading")]
    EmptyDomTree {
        /// URL of the page whose parse came back empty
        url: String,
    },
}

/// Internal invariant violations.
///
/// These should never occur for trees produced by this crate; raising one
/// signals a bug in an upstream processing stage.
#[derive(Error, Debug)]
pub enum InvariantError {
    /// An interaction node reached conversion without an id
    #[error("Interaction node has no id (role: {role}, text: {text})")]
    InteractionWithoutId {
        /// Role of the offending node
        role: String,
        /// Text label of the offending node
        text: String,
    },

    /// Conversion to the addressable view was requested for a
    /// non-interaction node
    #[error("Node '{id}' is not an interaction node (role: {role})")]
    NotAnInteractionNode {
        /// Id of the offending node
        id: String,
        /// Role of the offending node
        role: String,
    },

    /// Selector lookup on a node that never went through the builder
    #[error("Node '{id}' has no precomputed selectors")]
    MissingSelectors {
        /// Id of the node missing selectors
        id: String,
    },

    /// A subtree filter removed every node of the tree
    #[error("Operation '{operation}' resulted in an empty tree")]
    EmptyFilterResult {
        /// Name of the filtering operation
        operation: String,
    },
}

/// Action resolution errors.
///
/// These are caller-actionable: the id, value or parameters of the
/// submitted symbolic action were wrong for the current snapshot.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The action id does not exist in the current snapshot
    #[error("Action '{id}' not found in page context")]
    UnknownActionId {
        /// The unknown id
        id: String,
    },

    /// A value could not be parsed as a boolean
    #[error("Invalid boolean value: '{value}'")]
    InvalidBoolean {
        /// The unparsable value
        value: String,
    },

    /// A parameterized action arrived without its single required parameter
    #[error("Action '{id}' requires exactly one parameter")]
    MissingParameter {
        /// Id of the parameterized action
        id: String,
    },

    /// The node role has no action mapping
    #[error("Unknown action role '{role}' for id '{id}'")]
    UnknownActionRole {
        /// The unmapped role
        role: String,
        /// Id of the action
        id: String,
    },
}

/// Locator resolution errors
#[derive(Error, Debug)]
pub enum LocatorError {
    /// Neither the CSS nor the XPath strategy matched any element
    #[error("No element matches css='{css}' or xpath='{xpath}'")]
    NoMatch {
        /// CSS selector that was tried
        css: String,
        /// XPath selector that was tried
        xpath: String,
    },

    /// Frame descent was requested for a node outside any iframe
    #[error("Node is not inside an iframe")]
    NotInIframe,

    /// Backend failure while counting or descending
    #[error("Locator backend error: {0}")]
    Backend(String),
}

/// Result type alias for DomGraph operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_display() {
        let err = Error::Build(BuildError::EmptyDomTree {
            url: "https://example.com".to_string(),
        });
        assert!(err.to_string().contains("DOM tree is empty"));
        assert!(err.to_string().contains("example.com"));
    }

    #[test]
    fn test_invariant_error() {
        let err = InvariantError::MissingSelectors {
            id: "B1".to_string(),
        };
        assert_eq!(err.to_string(), "Node 'B1' has no precomputed selectors");
    }

    #[test]
    fn test_action_error() {
        let err = ActionError::UnknownActionRole {
            role: "widget".to_string(),
            id: "M3".to_string(),
        };
        assert!(err.to_string().contains("widget"));
        assert!(err.to_string().contains("M3"));
    }

    #[test]
    fn test_locator_error() {
        let err = LocatorError::NoMatch {
            css: "div.main".to_string(),
            xpath: "/html/body/div".to_string(),
        };
        assert!(err.to_string().contains("div.main"));
    }

    #[test]
    fn test_backend_error_wraps() {
        let err: Error = LocatorError::Backend("frame detached".to_string()).into();
        assert!(err.to_string().contains("frame detached"));
    }
}
