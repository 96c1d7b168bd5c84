//! DomGraph - DOM Snapshot Processing & Action Addressing Engine
//!
//! This crate turns raw DOM/accessibility snapshots into compact,
//! addressable trees for browser-automation agents: every interactive
//! element gets a short role-typed id (`B1`, `L3`, `I2`) that agents use
//! to submit actions, and the engine resolves those ids back to live
//! selectors, across iframe and shadow-DOM boundaries.
//!
//! # Features
//!
//! - **Tree building**: raw evaluator records → immutable arena trees
//!   with precomputed CSS paths and synthetic selectors
//! - **Id assignment**: deterministic role-prefixed ids in document order
//! - **Reduction**: pruning and folding that never lose an addressable node
//! - **Action resolution**: symbolic agent actions → concrete executor
//!   actions with resolved selectors
//! - **Snapshot diffing**: extract what changed since the last observation
//!
//! # Architecture
//!
//! ```text
//! Raw snapshot ──▶ TreeBuilder ──▶ DomTree ──▶ TreeReducer
//!                                    │
//!                      ┌─────────────┴─────────────┐
//!                      ▼                           ▼
//!               ActionResolver              diff_new_ids
//!                      │
//!                      ▼
//!               ConcreteAction ──▶ locate_element (FrameContext)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use domgraph::dom::{RawDomNode, TreeBuilder, TreeReducer};
//! use domgraph::action::{ActionResolver, SymbolicAction};
//!
//! fn main() -> domgraph::Result<()> {
//!     let raw: RawDomNode = serde_json::from_str(
//!         r#"{"type": "ELEMENT_NODE", "tagName": "body", "xpath": "/html/body",
//!             "children": [{"type": "ELEMENT_NODE", "tagName": "button",
//!                           "xpath": "/html/body/button", "isInteractive": true,
//!                           "highlightIndex": 0}]}"#,
//!     )?;
//!     let (tree, _diagnostics) = TreeBuilder::build(&raw, "https://example.com")?;
//!     let tree = TreeReducer::reduce(&tree);
//!
//!     let action: SymbolicAction = serde_json::from_str(r#"{"id": "B1"}"#)?;
//!     let concrete = ActionResolver::resolve(&action, &tree)?;
//!     println!("resolved: {:?}", concrete);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod action;
pub mod dom;
pub mod error;
pub mod locator;
pub mod snapshot;

// Re-exports for convenience
pub use action::{ActionResolver, ConcreteAction, StepAction, SymbolicAction};
pub use dom::{DomNode, DomTree, InteractionNode, RawDomNode, TreeBuilder, TreeReducer};
pub use error::{Error, Result};
pub use locator::{locate_element, resolve_selectors, FrameContext};
pub use snapshot::{diff_new_ids, Snapshot, SnapshotMetadata};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
