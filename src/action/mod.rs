//! Action vocabulary and symbolic→concrete resolution

mod resolver;
mod types;

pub use resolver::{parse_boolean, ActionResolver};
pub use types::{
    ActionRole, ActionTarget, BrowserAction, ConcreteAction, StepAction, SymbolicAction,
};
