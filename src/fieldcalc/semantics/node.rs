//! Typed evaluation tree
//!
//! The checker turns an [`Expr`](crate::fieldcalc::parser::Expr) into a
//! [`Node`] tree in which every kind and domain decision is already made.
//! Evaluation consumes the tree by value, so each intermediate result has
//! exactly one owner and is dropped as soon as its parent has used it.

use super::builtins::Builtin;
use super::types::ExprType;
use crate::fieldcalc::error::Span;
use crate::fieldcalc::parser::{BinaryOp, UnaryOp};
use crate::fieldcalc::value::{Domain, FieldType, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub ty: ExprType,
    pub span: Span,
    pub op: Op,
}

/// Which variant of a named field to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupSource {
    Current,
    OldTime,
    /// Interpolated from another region, optionally named.
    Mapped(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Constant(Value),
    Lookup {
        name: String,
        source: LookupSource,
        field_type: FieldType,
    },
    Unary(UnaryOp, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Conditional(Box<Node>, Box<Node>, Box<Node>),
    Component(Box<Node>, usize),
    /// Widen a rank-2 operand to the node's kind.
    Promote(Box<Node>),
    /// Spread a uniform operand over every element of a domain.
    Materialize(Box<Node>, Domain),
    Call(Builtin, Vec<Node>),
    Plugin {
        name: String,
        arguments: String,
        offset: usize,
        field_type: FieldType,
    },
}

impl Node {
    pub fn new(ty: ExprType, span: Span, op: Op) -> Self {
        Self { ty, span, op }
    }

    pub fn is_plugin(&self) -> bool {
        matches!(self.op, Op::Plugin { .. })
    }
}
