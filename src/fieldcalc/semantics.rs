//! Kind checking and evaluation of parsed expressions
//!
//! [`check`] turns the untyped syntax tree into a typed [`node::Node`] tree and
//! rejects operand kinds no operator accepts. [`eval`] then walks that tree
//! bottom-up over broadcastable [`operand::Operand`] values.

pub mod builtins;
pub(crate) mod check;
pub(crate) mod eval;
pub mod node;
pub mod numeric;
pub mod operand;
pub mod reduce;
pub mod types;

pub use types::{ExprType, Shape};
