//! Broadcastable columns of one element type
//!
//! A [`Column`] is either a single uniform value or a domain-bound vector of
//! values. Combining columns broadcasts uniform operands; two non-uniform
//! operands must have the same length or the combination fails with
//! [`ExprError::SizeMismatch`].

use super::Domain;
use crate::fieldcalc::error::{ExprError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Column<T> {
    Uniform(T),
    Values { domain: Domain, data: Vec<T> },
}

/// Domain and length of a non-uniform column.
pub type Extent = Option<(Domain, usize)>;

/// Merge the extents of several operands, failing on unequal lengths.
pub fn common_extent(extents: &[Extent]) -> Result<Extent> {
    let mut common: Extent = None;
    for extent in extents.iter().flatten() {
        match common {
            None => common = Some(*extent),
            Some((_, len)) if len != extent.1 => {
                return Err(ExprError::SizeMismatch {
                    left: len,
                    right: extent.1,
                })
            }
            Some(_) => {}
        }
    }
    Ok(common)
}

impl<T: Clone> Column<T> {
    pub fn extent(&self) -> Extent {
        match self {
            Column::Uniform(_) => None,
            Column::Values { domain, data } => Some((*domain, data.len())),
        }
    }

    /// Element `index`; uniform columns answer every index.
    pub fn at(&self, index: usize) -> T {
        match self {
            Column::Uniform(value) => value.clone(),
            Column::Values { data, .. } => data[index].clone(),
        }
    }

    pub fn map<U>(self, f: impl Fn(T) -> U) -> Column<U> {
        match self {
            Column::Uniform(value) => Column::Uniform(f(value)),
            Column::Values { domain, data } => Column::Values {
                domain,
                data: data.into_iter().map(f).collect(),
            },
        }
    }

    pub fn zip_with<U: Clone, R>(
        self,
        other: Column<U>,
        f: impl Fn(T, U) -> R,
    ) -> Result<Column<R>> {
        let extent = common_extent(&[self.extent(), other.extent()])?;
        Ok(match extent {
            None => Column::Uniform(f(self.at(0), other.at(0))),
            Some((domain, len)) => Column::Values {
                domain,
                data: (0..len).map(|i| f(self.at(i), other.at(i))).collect(),
            },
        })
    }

    /// Build a column from `n` same-typed inputs, e.g. a vector from three scalars.
    pub fn combine<R>(inputs: &[Column<T>], f: impl Fn(&[T]) -> R) -> Result<Column<R>> {
        let extents: Vec<Extent> = inputs.iter().map(Column::extent).collect();
        let element = |i: usize| {
            let row: Vec<T> = inputs.iter().map(|c| c.at(i)).collect();
            f(&row)
        };
        Ok(match common_extent(&extents)? {
            None => Column::Uniform(element(0)),
            Some((domain, len)) => Column::Values {
                domain,
                data: (0..len).map(element).collect(),
            },
        })
    }

    /// Repeat a uniform value over `len` elements of `domain`; non-uniform
    /// columns are returned unchanged.
    pub fn materialize(self, domain: Domain, len: usize) -> (Domain, Vec<T>) {
        match self {
            Column::Uniform(value) => (domain, vec![value; len]),
            Column::Values { domain, data } => (domain, data),
        }
    }
}

impl Column<bool> {
    /// Elementwise selection between two branches.
    pub fn select<T: Clone>(
        self,
        when_true: Column<T>,
        when_false: Column<T>,
    ) -> Result<Column<T>> {
        let extent = common_extent(&[self.extent(), when_true.extent(), when_false.extent()])?;
        let pick = |i: usize| {
            if self.at(i) {
                when_true.at(i)
            } else {
                when_false.at(i)
            }
        };
        Ok(match extent {
            None => Column::Uniform(pick(0)),
            Some((domain, len)) => Column::Values {
                domain,
                data: (0..len).map(pick).collect(),
            },
        })
    }
}
