//! Value kinds, domains and the field abstraction
//!
//! Every value the evaluator touches is one of six kinds. Values live either
//! as a single constant or as a field: a fixed-length sequence of one kind
//! attached to mesh cells or mesh points.

pub mod algebra;
pub mod column;
pub mod field;
pub mod primitives;

pub use column::Column;
pub use field::{Field, FieldValues, Value};
pub use primitives::{Primitive, SphericalTensor, SymmTensor, Tensor, Vector};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Scalar,
    Vector,
    Tensor,
    SymmTensor,
    SphericalTensor,
    Logical,
}

impl ValueKind {
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Scalar,
        ValueKind::Vector,
        ValueKind::Tensor,
        ValueKind::SymmTensor,
        ValueKind::SphericalTensor,
        ValueKind::Logical,
    ];

    /// Number of components one value of this kind carries.
    pub fn component_count(self) -> usize {
        match self {
            ValueKind::Scalar | ValueKind::SphericalTensor | ValueKind::Logical => 1,
            ValueKind::Vector => 3,
            ValueKind::Tensor => 9,
            ValueKind::SymmTensor => 6,
        }
    }

    /// Accessor names in storage order. Scalars and logicals have none.
    pub fn component_names(self) -> &'static [&'static str] {
        match self {
            ValueKind::Vector => &["x", "y", "z"],
            ValueKind::Tensor => &["xx", "xy", "xz", "yx", "yy", "yz", "zx", "zy", "zz"],
            ValueKind::SymmTensor => &["xx", "xy", "xz", "yy", "yz", "zz"],
            ValueKind::SphericalTensor => &["ii"],
            ValueKind::Scalar | ValueKind::Logical => &[],
        }
    }

    pub fn component_index(self, name: &str) -> Option<usize> {
        self.component_names().iter().position(|c| *c == name)
    }

    pub fn is_numeric(self) -> bool {
        self != ValueKind::Logical
    }

    /// Tensor, SymmTensor or SphericalTensor.
    pub fn is_rank2(self) -> bool {
        matches!(
            self,
            ValueKind::Tensor | ValueKind::SymmTensor | ValueKind::SphericalTensor
        )
    }

    /// Position in the rank-2 promotion order `SphericalTensor < SymmTensor < Tensor`.
    pub(crate) fn rank2_order(self) -> Option<u8> {
        match self {
            ValueKind::SphericalTensor => Some(0),
            ValueKind::SymmTensor => Some(1),
            ValueKind::Tensor => Some(2),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Vector => "vector",
            ValueKind::Tensor => "tensor",
            ValueKind::SymmTensor => "symmTensor",
            ValueKind::SphericalTensor => "sphericalTensor",
            ValueKind::Logical => "logical",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the values of a field are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Domain {
    /// One value per cell (or per face on a boundary patch).
    Cell,
    /// One value per mesh vertex.
    Point,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Cell => f.write_str("cell"),
            Domain::Point => f.write_str("point"),
        }
    }
}

/// A kind together with its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    pub kind: ValueKind,
    pub domain: Domain,
}

impl FieldType {
    pub fn new(kind: ValueKind, domain: Domain) -> Self {
        Self { kind, domain }
    }

    pub fn cell(kind: ValueKind) -> Self {
        Self::new(kind, Domain::Cell)
    }

    pub fn point(kind: ValueKind) -> Self {
        Self::new(kind, Domain::Point)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} field", self.domain, self.kind)
    }
}
