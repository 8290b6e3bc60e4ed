//! Intermediate results of evaluation
//!
//! An [`Operand`] is a broadcastable [`Column`] tagged with its kind. It is
//! the sum type every operator matches on.

use crate::fieldcalc::error::{ExprError, Result, Span};
use crate::fieldcalc::value::column::Extent;
use crate::fieldcalc::value::{
    Column, Domain, Field, FieldValues, SphericalTensor, SymmTensor, Tensor, Value, ValueKind,
    Vector,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Column<f64>),
    Vector(Column<Vector>),
    Tensor(Column<Tensor>),
    SymmTensor(Column<SymmTensor>),
    SphericalTensor(Column<SphericalTensor>),
    Logical(Column<bool>),
}

/// Apply the same generic expression to the column of any kind, keeping it.
macro_rules! map_operand {
    ($operand:expr, $c:ident => $body:expr) => {
        match $operand {
            Operand::Scalar($c) => Operand::Scalar($body),
            Operand::Vector($c) => Operand::Vector($body),
            Operand::Tensor($c) => Operand::Tensor($body),
            Operand::SymmTensor($c) => Operand::SymmTensor($body),
            Operand::SphericalTensor($c) => Operand::SphericalTensor($body),
            Operand::Logical($c) => Operand::Logical($body),
        }
    };
}

fn values<T>(domain: Domain, data: Vec<T>) -> Column<T> {
    Column::Values { domain, data }
}

impl Operand {
    pub fn kind(&self) -> ValueKind {
        match self {
            Operand::Scalar(_) => ValueKind::Scalar,
            Operand::Vector(_) => ValueKind::Vector,
            Operand::Tensor(_) => ValueKind::Tensor,
            Operand::SymmTensor(_) => ValueKind::SymmTensor,
            Operand::SphericalTensor(_) => ValueKind::SphericalTensor,
            Operand::Logical(_) => ValueKind::Logical,
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            Operand::Scalar(c) => c.extent(),
            Operand::Vector(c) => c.extent(),
            Operand::Tensor(c) => c.extent(),
            Operand::SymmTensor(c) => c.extent(),
            Operand::SphericalTensor(c) => c.extent(),
            Operand::Logical(c) => c.extent(),
        }
    }

    /// The single value of a uniform operand.
    pub fn single(&self) -> Option<Value> {
        let value = match self {
            Operand::Scalar(Column::Uniform(v)) => Value::Scalar(*v),
            Operand::Vector(Column::Uniform(v)) => Value::Vector(*v),
            Operand::Tensor(Column::Uniform(v)) => Value::Tensor(*v),
            Operand::SymmTensor(Column::Uniform(v)) => Value::SymmTensor(*v),
            Operand::SphericalTensor(Column::Uniform(v)) => Value::SphericalTensor(*v),
            Operand::Logical(Column::Uniform(v)) => Value::Logical(*v),
            _ => return None,
        };
        Some(value)
    }

    /// Turn the operand into a field of `domain`, spreading uniform values
    /// over `len` elements.
    pub fn into_field(self, domain: Domain, len: usize) -> Field {
        match self {
            Operand::Scalar(c) => {
                let (d, data) = c.materialize(domain, len);
                Field::new(d, FieldValues::Scalar(data))
            }
            Operand::Vector(c) => {
                let (d, data) = c.materialize(domain, len);
                Field::new(d, FieldValues::Vector(data))
            }
            Operand::Tensor(c) => {
                let (d, data) = c.materialize(domain, len);
                Field::new(d, FieldValues::Tensor(data))
            }
            Operand::SymmTensor(c) => {
                let (d, data) = c.materialize(domain, len);
                Field::new(d, FieldValues::SymmTensor(data))
            }
            Operand::SphericalTensor(c) => {
                let (d, data) = c.materialize(domain, len);
                Field::new(d, FieldValues::SphericalTensor(data))
            }
            Operand::Logical(c) => {
                let (d, data) = c.materialize(domain, len);
                Field::new(d, FieldValues::Logical(data))
            }
        }
    }

    /// Spread a uniform operand over a domain; fields pass through.
    pub fn spread(self, domain: Domain, len: usize) -> Operand {
        map_operand!(self, c => {
            let (d, data) = c.materialize(domain, len);
            values(d, data)
        })
    }

    /// Widen a rank-2 operand to `target`.
    pub fn promote(self, target: ValueKind, span: &Span) -> Result<Operand> {
        Ok(match (self, target) {
            (op, target) if op.kind() == target => op,
            (Operand::SphericalTensor(c), ValueKind::SymmTensor) => {
                Operand::SymmTensor(c.map(SymmTensor::from))
            }
            (Operand::SphericalTensor(c), ValueKind::Tensor) => {
                Operand::Tensor(c.map(Tensor::from))
            }
            (Operand::SymmTensor(c), ValueKind::Tensor) => Operand::Tensor(c.map(Tensor::from)),
            (op, target) => {
                return Err(ExprError::kind_mismatch(target, op.kind(), span.clone()))
            }
        })
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        match value {
            Value::Scalar(v) => Operand::Scalar(Column::Uniform(v)),
            Value::Vector(v) => Operand::Vector(Column::Uniform(v)),
            Value::Tensor(v) => Operand::Tensor(Column::Uniform(v)),
            Value::SymmTensor(v) => Operand::SymmTensor(Column::Uniform(v)),
            Value::SphericalTensor(v) => Operand::SphericalTensor(Column::Uniform(v)),
            Value::Logical(v) => Operand::Logical(Column::Uniform(v)),
        }
    }
}

impl From<Field> for Operand {
    fn from(field: Field) -> Self {
        let domain = field.domain();
        match field.into_values() {
            FieldValues::Scalar(data) => Operand::Scalar(values(domain, data)),
            FieldValues::Vector(data) => Operand::Vector(values(domain, data)),
            FieldValues::Tensor(data) => Operand::Tensor(values(domain, data)),
            FieldValues::SymmTensor(data) => Operand::SymmTensor(values(domain, data)),
            FieldValues::SphericalTensor(data) => Operand::SphericalTensor(values(domain, data)),
            FieldValues::Logical(data) => Operand::Logical(values(domain, data)),
        }
    }
}
