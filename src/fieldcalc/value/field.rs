//! Single values and fields

use super::primitives::{Primitive, SphericalTensor, SymmTensor, Tensor, Vector};
use super::{Domain, FieldType, ValueKind};
use serde::{Deserialize, Serialize};

/// A single value of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    Scalar(f64),
    Vector(Vector),
    Tensor(Tensor),
    SymmTensor(SymmTensor),
    SphericalTensor(SphericalTensor),
    Logical(bool),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vector(_) => ValueKind::Vector,
            Value::Tensor(_) => ValueKind::Tensor,
            Value::SymmTensor(_) => ValueKind::SymmTensor,
            Value::SphericalTensor(_) => ValueKind::SphericalTensor,
            Value::Logical(_) => ValueKind::Logical,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vector> {
        match self {
            Value::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_logical(&self) -> Option<bool> {
        match self {
            Value::Logical(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric components, empty for logicals.
    pub fn components(&self) -> &[f64] {
        match self {
            Value::Scalar(v) => v.components(),
            Value::Vector(v) => v.components(),
            Value::Tensor(v) => v.components(),
            Value::SymmTensor(v) => v.components(),
            Value::SphericalTensor(v) => v.components(),
            Value::Logical(_) => &[],
        }
    }
}

/// Storage of a field, one vector per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValues {
    Scalar(Vec<f64>),
    Vector(Vec<Vector>),
    Tensor(Vec<Tensor>),
    SymmTensor(Vec<SymmTensor>),
    SphericalTensor(Vec<SphericalTensor>),
    Logical(Vec<bool>),
}

macro_rules! each_values {
    ($values:expr, $v:ident => $body:expr) => {
        match $values {
            FieldValues::Scalar($v) => $body,
            FieldValues::Vector($v) => $body,
            FieldValues::Tensor($v) => $body,
            FieldValues::SymmTensor($v) => $body,
            FieldValues::SphericalTensor($v) => $body,
            FieldValues::Logical($v) => $body,
        }
    };
}

macro_rules! each_numeric {
    ($values:expr, $v:ident => $body:expr, logical $l:ident => $lbody:expr) => {
        match $values {
            FieldValues::Scalar($v) => FieldValues::Scalar($body),
            FieldValues::Vector($v) => FieldValues::Vector($body),
            FieldValues::Tensor($v) => FieldValues::Tensor($body),
            FieldValues::SymmTensor($v) => FieldValues::SymmTensor($body),
            FieldValues::SphericalTensor($v) => FieldValues::SphericalTensor($body),
            FieldValues::Logical($l) => FieldValues::Logical($lbody),
        }
    };
}

impl FieldValues {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValues::Scalar(_) => ValueKind::Scalar,
            FieldValues::Vector(_) => ValueKind::Vector,
            FieldValues::Tensor(_) => ValueKind::Tensor,
            FieldValues::SymmTensor(_) => ValueKind::SymmTensor,
            FieldValues::SphericalTensor(_) => ValueKind::SphericalTensor,
            FieldValues::Logical(_) => ValueKind::Logical,
        }
    }

    pub fn len(&self) -> usize {
        each_values!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `len` copies of `value`.
    pub fn repeat(value: Value, len: usize) -> Self {
        match value {
            Value::Scalar(v) => FieldValues::Scalar(vec![v; len]),
            Value::Vector(v) => FieldValues::Vector(vec![v; len]),
            Value::Tensor(v) => FieldValues::Tensor(vec![v; len]),
            Value::SymmTensor(v) => FieldValues::SymmTensor(vec![v; len]),
            Value::SphericalTensor(v) => FieldValues::SphericalTensor(vec![v; len]),
            Value::Logical(v) => FieldValues::Logical(vec![v; len]),
        }
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            FieldValues::Scalar(v) => v.get(index).map(|x| Value::Scalar(*x)),
            FieldValues::Vector(v) => v.get(index).map(|x| Value::Vector(*x)),
            FieldValues::Tensor(v) => v.get(index).map(|x| Value::Tensor(*x)),
            FieldValues::SymmTensor(v) => v.get(index).map(|x| Value::SymmTensor(*x)),
            FieldValues::SphericalTensor(v) => v.get(index).map(|x| Value::SphericalTensor(*x)),
            FieldValues::Logical(v) => v.get(index).map(|x| Value::Logical(*x)),
        }
    }

    /// Average the values listed in each group. Numeric kinds take the
    /// arithmetic mean; logicals are true when any member is. An empty group
    /// yields the zero value.
    pub fn average_groups(&self, groups: &[Vec<usize>]) -> FieldValues {
        each_numeric!(self,
            v => groups.iter().map(|g| mean(v, g)).collect(),
            logical l => groups
                .iter()
                .map(|g| g.iter().any(|&i| l.get(i).copied().unwrap_or(false)))
                .collect()
        )
    }
}

fn mean<T: Primitive>(values: &[T], group: &[usize]) -> T {
    let members: Vec<&T> = group.iter().filter_map(|&i| values.get(i)).collect();
    if members.is_empty() {
        return T::default();
    }
    let n = members.len() as f64;
    T::from_fn(|c| members.iter().map(|m| m.components()[c]).sum::<f64>() / n)
}

/// A fixed-length sequence of one kind attached to one domain.
///
/// The values are only reachable through shared references, so a field is
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    domain: Domain,
    values: FieldValues,
}

impl Field {
    pub fn new(domain: Domain, values: FieldValues) -> Self {
        Self { domain, values }
    }

    pub fn uniform(value: Value, domain: Domain, len: usize) -> Self {
        Self::new(domain, FieldValues::repeat(value, len))
    }

    pub fn scalar(domain: Domain, values: Vec<f64>) -> Self {
        Self::new(domain, FieldValues::Scalar(values))
    }

    pub fn vector(domain: Domain, values: Vec<Vector>) -> Self {
        Self::new(domain, FieldValues::Vector(values))
    }

    pub fn tensor(domain: Domain, values: Vec<Tensor>) -> Self {
        Self::new(domain, FieldValues::Tensor(values))
    }

    pub fn symm_tensor(domain: Domain, values: Vec<SymmTensor>) -> Self {
        Self::new(domain, FieldValues::SymmTensor(values))
    }

    pub fn spherical_tensor(domain: Domain, values: Vec<SphericalTensor>) -> Self {
        Self::new(domain, FieldValues::SphericalTensor(values))
    }

    pub fn logical(domain: Domain, values: Vec<bool>) -> Self {
        Self::new(domain, FieldValues::Logical(values))
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn kind(&self) -> ValueKind {
        self.values.kind()
    }

    pub fn field_type(&self) -> FieldType {
        FieldType::new(self.kind(), self.domain)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn into_values(self) -> FieldValues {
        self.values
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.values.get(index)
    }

    pub fn as_scalars(&self) -> Option<&[f64]> {
        match &self.values {
            FieldValues::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vectors(&self) -> Option<&[Vector]> {
        match &self.values {
            FieldValues::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_logicals(&self) -> Option<&[bool]> {
        match &self.values {
            FieldValues::Logical(v) => Some(v),
            _ => None,
        }
    }

    /// True when any numeric component is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        (0..self.len()).any(|i| {
            self.get(i)
                .map(|v| v.components().iter().any(|c| !c.is_finite()))
                .unwrap_or(false)
        })
    }
}
