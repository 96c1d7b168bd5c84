//! DOM snapshot model and processing pipeline
//!
//! Raw evaluator records flow through [`builder::TreeBuilder`] into an
//! immutable [`node::DomTree`], get their short ids from the sequential
//! assigner, and are shrunk for presentation by [`reduce::TreeReducer`].
//! [`diff::diff_new_ids`] extracts what changed between snapshots.

pub mod attributes;
pub mod builder;
pub mod csspath;
pub mod diff;
mod ids;
pub mod node;
pub mod reduce;
pub mod role;

pub use attributes::{Diagnostics, DomAttributes};
pub use builder::{RawDomNode, TreeBuilder};
pub use csspath::{build_csspath, xpath_to_css_path};
pub use diff::diff_new_ids;
pub use node::{ComputedAttributes, DomNode, DomTree, InteractionNode, NodeId, Selectors};
pub use reduce::TreeReducer;
pub use role::{element_role, NodeCategory, NodeKind, NodeRole, Role};
