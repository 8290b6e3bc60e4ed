//! Fixed-size numeric primitives
//!
//! `Vector`, `Tensor`, `SymmTensor` and `SphericalTensor` store their
//! components in the accessor order listed by [`ValueKind::component_names`].
//! Arithmetic that is the same for every kind (sum, difference, negation,
//! scaling) is implemented componentwise through [`componentwise!`].

use super::field::Value;
use super::ValueKind;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Common interface of every numeric element type, including `f64`.
pub trait Primitive: Copy + Default + PartialEq + Debug {
    const KIND: ValueKind;

    fn components(&self) -> &[f64];

    /// Build a value from its components in storage order.
    fn from_fn(f: impl FnMut(usize) -> f64) -> Self;

    /// Squared norm with the tensor-family conventions: symmetric off-diagonals
    /// count twice, a spherical tensor counts its diagonal three times.
    fn mag_sqr(&self) -> f64;

    fn into_value(self) -> Value;

    fn mag(&self) -> f64 {
        self.mag_sqr().sqrt()
    }

    fn map_components(&self, f: impl Fn(f64) -> f64) -> Self {
        let c = self.components();
        Self::from_fn(|i| f(c[i]))
    }

    fn zip_components(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let a = self.components();
        let b = other.components();
        Self::from_fn(|i| f(a[i], b[i]))
    }
}

impl Primitive for f64 {
    const KIND: ValueKind = ValueKind::Scalar;

    fn components(&self) -> &[f64] {
        std::slice::from_ref(self)
    }

    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        f(0)
    }

    fn mag_sqr(&self) -> f64 {
        self * self
    }

    fn into_value(self) -> Value {
        Value::Scalar(self)
    }
}

macro_rules! componentwise {
    ($name:ident, $n:expr, $kind:ident) => {
        impl $name {
            pub fn zero() -> Self {
                Self([0.0; $n])
            }

            pub fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
                Self(std::array::from_fn(f))
            }

            pub fn uniform(value: f64) -> Self {
                Self([value; $n])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl Primitive for $name {
            const KIND: ValueKind = ValueKind::$kind;

            fn components(&self) -> &[f64] {
                &self.0
            }

            fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
                $name::from_fn(f)
            }

            fn mag_sqr(&self) -> f64 {
                self.norm_sqr()
            }

            fn into_value(self) -> Value {
                Value::$kind(self)
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self::from_fn(|i| self.0[i] + rhs.0[i])
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self::from_fn(|i| self.0[i] - rhs.0[i])
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self::from_fn(|i| -self.0[i])
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self::from_fn(|i| self.0[i] * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                rhs * self
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self::from_fn(|i| self.0[i] / rhs)
            }
        }
    };
}

/// Three components `x y z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector(pub [f64; 3]);

/// Nine components, row-major `xx xy xz yx yy yz zx zy zz`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tensor(pub [f64; 9]);

/// Upper triangle `xx xy xz yy yz zz` of a symmetric tensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymmTensor(pub [f64; 6]);

/// A multiple of the identity, stored as its diagonal value `ii`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalTensor(pub [f64; 1]);

componentwise!(Vector, 3, Vector);
componentwise!(Tensor, 9, Tensor);
componentwise!(SymmTensor, 6, SymmTensor);
componentwise!(SphericalTensor, 1, SphericalTensor);

impl Vector {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }

    fn norm_sqr(&self) -> f64 {
        self.0.iter().map(|c| c * c).sum()
    }
}

impl Tensor {
    pub fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// Component at row `i`, column `j`.
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.0[3 * i + j]
    }

    fn norm_sqr(&self) -> f64 {
        self.0.iter().map(|c| c * c).sum()
    }
}

impl SymmTensor {
    pub fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 1.0, 0.0, 1.0])
    }

    fn norm_sqr(&self) -> f64 {
        let [xx, xy, xz, yy, yz, zz] = self.0;
        xx * xx + yy * yy + zz * zz + 2.0 * (xy * xy + xz * xz + yz * yz)
    }
}

impl SphericalTensor {
    pub fn new(ii: f64) -> Self {
        Self([ii])
    }

    pub fn ii(&self) -> f64 {
        self.0[0]
    }

    fn norm_sqr(&self) -> f64 {
        3.0 * self.0[0] * self.0[0]
    }
}

impl From<SymmTensor> for Tensor {
    fn from(s: SymmTensor) -> Self {
        let [xx, xy, xz, yy, yz, zz] = s.0;
        Tensor([xx, xy, xz, xy, yy, yz, xz, yz, zz])
    }
}

impl From<SphericalTensor> for Tensor {
    fn from(s: SphericalTensor) -> Self {
        Tensor::identity() * s.ii()
    }
}

impl From<SphericalTensor> for SymmTensor {
    fn from(s: SphericalTensor) -> Self {
        SymmTensor::identity() * s.ii()
    }
}
