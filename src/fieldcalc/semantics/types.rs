//! Static types of expressions and the kind rules of every operator
//!
//! An expression's type is its value kind plus its shape: a single uniform
//! value, or a field in one domain. The rules here are the single place that
//! decides which operand kinds an operator accepts and what it produces.

use crate::fieldcalc::parser::{BinaryOp, UnaryOp};
use crate::fieldcalc::value::{Domain, ValueKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Uniform,
    Field(Domain),
}

impl Shape {
    /// Shape of a combination: uniform operands broadcast, fields must share
    /// their domain.
    pub fn merge(self, other: Shape) -> Option<Shape> {
        match (self, other) {
            (Shape::Uniform, s) | (s, Shape::Uniform) => Some(s),
            (Shape::Field(a), Shape::Field(b)) if a == b => Some(self),
            _ => None,
        }
    }

    pub fn domain(self) -> Option<Domain> {
        match self {
            Shape::Uniform => None,
            Shape::Field(domain) => Some(domain),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprType {
    pub kind: ValueKind,
    pub shape: Shape,
}

impl ExprType {
    pub fn new(kind: ValueKind, shape: Shape) -> Self {
        Self { kind, shape }
    }

    pub fn uniform(kind: ValueKind) -> Self {
        Self::new(kind, Shape::Uniform)
    }

    pub fn field(kind: ValueKind, domain: Domain) -> Self {
        Self::new(kind, Shape::Field(domain))
    }

    pub fn with_kind(self, kind: ValueKind) -> Self {
        Self::new(kind, self.shape)
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Shape::Uniform => write!(f, "single {}", self.kind),
            Shape::Field(domain) => write!(f, "{} {} field", domain, self.kind),
        }
    }
}

/// The larger of two rank-2 kinds, `SphericalTensor < SymmTensor < Tensor`.
pub fn promote_rank2(a: ValueKind, b: ValueKind) -> Option<ValueKind> {
    let (oa, ob) = (a.rank2_order()?, b.rank2_order()?);
    Some(if oa >= ob { a } else { b })
}

/// Result kind of `l op r`, `None` when the pair is not accepted.
pub fn binary_result(op: BinaryOp, l: ValueKind, r: ValueKind) -> Option<ValueKind> {
    use ValueKind::*;

    match op {
        BinaryOp::Add | BinaryOp::Subtract => {
            if l == r && l.is_numeric() {
                Some(l)
            } else {
                promote_rank2(l, r)
            }
        }
        BinaryOp::Multiply => match (l, r) {
            (Scalar, k) | (k, Scalar) if k.is_numeric() => Some(k),
            (Vector, Vector) => Some(Tensor),
            _ => None,
        },
        BinaryOp::Divide => (r == Scalar && l.is_numeric()).then_some(l),
        BinaryOp::Modulo => (l == Scalar && r == Scalar).then_some(Scalar),
        BinaryOp::Dot => match (l, r) {
            (Vector, Vector) => Some(Scalar),
            (k, Vector) | (Vector, k) if k.is_rank2() => Some(Vector),
            (SphericalTensor, SphericalTensor) => Some(SphericalTensor),
            (a, b) if a.is_rank2() && b.is_rank2() => Some(Tensor),
            _ => None,
        },
        BinaryOp::Cross => (l == Vector && r == Vector).then_some(Vector),
        BinaryOp::AndAnd => match (l, r) {
            (Logical, Logical) => Some(Logical),
            (a, b) if a.is_rank2() && b.is_rank2() => Some(Scalar),
            _ => None,
        },
        BinaryOp::Or => (l == Logical && r == Logical).then_some(Logical),
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
            (l == Scalar && r == Scalar).then_some(Logical)
        }
        BinaryOp::Equal | BinaryOp::NotEqual => {
            (l == r && matches!(l, Scalar | Logical)).then_some(Logical)
        }
    }
}

/// Result kind of a prefix operator.
pub fn unary_result(op: UnaryOp, kind: ValueKind) -> Option<ValueKind> {
    match (op, kind) {
        (UnaryOp::Negate, k) if k.is_numeric() => Some(k),
        (UnaryOp::Not, ValueKind::Logical) => Some(ValueKind::Logical),
        (UnaryOp::Hodge, ValueKind::Tensor) => Some(ValueKind::Vector),
        (UnaryOp::Hodge, ValueKind::Vector) => Some(ValueKind::Tensor),
        _ => None,
    }
}
