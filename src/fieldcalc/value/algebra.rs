//! Products, decompositions and invariants of the numeric primitives
//!
//! Symmetric and spherical tensors reuse the full-tensor routines through the
//! lossless conversions into [`Tensor`], then project back where the result
//! stays symmetric. Singular tensors are not guarded: `inv` divides by the
//! determinant and yields whatever IEEE arithmetic produces.

use super::primitives::{SphericalTensor, SymmTensor, Tensor, Vector};
use nalgebra::Matrix3;

impl Vector {
    pub fn dot(&self, other: &Vector) -> f64 {
        self.0[0] * other.0[0] + self.0[1] * other.0[1] + self.0[2] * other.0[2]
    }

    pub fn cross(&self, other: &Vector) -> Vector {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = other.0;
        Vector::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Outer product `a b`, entry `(i, j)` is `a_i * b_j`.
    pub fn outer(&self, other: &Vector) -> Tensor {
        Tensor::from_fn(|k| self.0[k / 3] * other.0[k % 3])
    }

    /// Hodge dual, the skew tensor whose dual is this vector.
    pub fn hodge(&self) -> Tensor {
        let [x, y, z] = self.0;
        Tensor([0.0, -z, y, z, 0.0, -x, -y, x, 0.0])
    }

    /// `v & T`
    pub fn dot_tensor(&self, t: &Tensor) -> Vector {
        Vector::from_fn(|j| (0..3).map(|i| self.0[i] * t.at(i, j)).sum())
    }
}

impl Tensor {
    pub fn transpose(&self) -> Tensor {
        Tensor::from_fn(|k| self.at(k % 3, k / 3))
    }

    pub fn trace(&self) -> f64 {
        self.0[0] + self.0[4] + self.0[8]
    }

    pub fn det(&self) -> f64 {
        let [xx, xy, xz, yx, yy, yz, zx, zy, zz] = self.0;
        xx * yy * zz + xy * yz * zx + xz * yx * zy - xx * yz * zy - xy * yx * zz - xz * yy * zx
    }

    /// Cofactor tensor, `det(T) * inv(T)^T`.
    pub fn cof(&self) -> Tensor {
        let [xx, xy, xz, yx, yy, yz, zx, zy, zz] = self.0;
        Tensor([
            yy * zz - zy * yz,
            zx * yz - yx * zz,
            yx * zy - yy * zx,
            xz * zy - xy * zz,
            xx * zz - xz * zx,
            xy * zx - xx * zy,
            xy * yz - xz * yy,
            xz * yx - xx * yz,
            xx * yy - xy * yx,
        ])
    }

    pub fn inv(&self) -> Tensor {
        self.cof().transpose() / self.det()
    }

    /// Deviatoric part `T - tr(T)/3 I`.
    pub fn dev(&self) -> Tensor {
        *self - Tensor::identity() * (self.trace() / 3.0)
    }

    /// `T - 2 tr(T)/3 I`
    pub fn dev2(&self) -> Tensor {
        *self - Tensor::identity() * (2.0 * self.trace() / 3.0)
    }

    pub fn symm(&self) -> SymmTensor {
        SymmTensor::from_upper(&((*self + self.transpose()) * 0.5))
    }

    pub fn two_symm(&self) -> SymmTensor {
        SymmTensor::from_upper(&(*self + self.transpose()))
    }

    pub fn skew(&self) -> Tensor {
        (*self - self.transpose()) * 0.5
    }

    pub fn sph(&self) -> SphericalTensor {
        SphericalTensor::new(self.trace() / 3.0)
    }

    pub fn diag(&self) -> Vector {
        Vector::new(self.0[0], self.0[4], self.0[8])
    }

    /// Hodge dual of the skew part, `(yz, -xz, xy)`.
    pub fn hodge(&self) -> Vector {
        Vector::new(self.at(1, 2), -self.at(0, 2), self.at(0, 1))
    }

    /// Single contraction `T & S` (matrix product).
    pub fn dot(&self, other: &Tensor) -> Tensor {
        Tensor::from_fn(|k| {
            let (i, j) = (k / 3, k % 3);
            (0..3).map(|m| self.at(i, m) * other.at(m, j)).sum()
        })
    }

    /// `T & v`
    pub fn dot_vector(&self, v: &Vector) -> Vector {
        Vector::from_fn(|i| (0..3).map(|j| self.at(i, j) * v.0[j]).sum())
    }

    /// Double contraction `T && S`.
    pub fn double_dot(&self, other: &Tensor) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// Eigenvalues of the symmetric part in ascending order.
    pub fn eigen_values(&self) -> Vector {
        let (values, _) = self.symmetric_eigen();
        values
    }

    /// Unit eigenvectors of the symmetric part as tensor rows, ordered like
    /// [`Tensor::eigen_values`].
    pub fn eigen_vectors(&self) -> Tensor {
        let (_, vectors) = self.symmetric_eigen();
        vectors
    }

    fn symmetric_eigen(&self) -> (Vector, Tensor) {
        let m = Matrix3::from_row_slice(&self.0);
        let symmetric = (m + m.transpose()) * 0.5;
        let eigen = symmetric.symmetric_eigen();

        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let values = Vector::from_fn(|i| eigen.eigenvalues[order[i]]);
        let vectors = Tensor::from_fn(|k| eigen.eigenvectors[(k % 3, order[k / 3])]);
        (values, vectors)
    }
}

impl SymmTensor {
    /// Keep the upper triangle of a tensor that is known to be symmetric.
    pub fn from_upper(t: &Tensor) -> SymmTensor {
        SymmTensor([t.0[0], t.0[1], t.0[2], t.0[4], t.0[5], t.0[8]])
    }

    pub fn trace(&self) -> f64 {
        self.0[0] + self.0[3] + self.0[5]
    }

    pub fn det(&self) -> f64 {
        Tensor::from(*self).det()
    }

    pub fn cof(&self) -> SymmTensor {
        SymmTensor::from_upper(&Tensor::from(*self).cof())
    }

    pub fn inv(&self) -> SymmTensor {
        SymmTensor::from_upper(&Tensor::from(*self).inv())
    }

    pub fn dev(&self) -> SymmTensor {
        *self - SymmTensor::identity() * (self.trace() / 3.0)
    }

    pub fn dev2(&self) -> SymmTensor {
        *self - SymmTensor::identity() * (2.0 * self.trace() / 3.0)
    }

    pub fn sph(&self) -> SphericalTensor {
        SphericalTensor::new(self.trace() / 3.0)
    }

    pub fn diag(&self) -> Vector {
        Vector::new(self.0[0], self.0[3], self.0[5])
    }
}

impl SphericalTensor {
    pub fn trace(&self) -> f64 {
        3.0 * self.ii()
    }

    pub fn det(&self) -> f64 {
        self.ii().powi(3)
    }

    pub fn inv(&self) -> SphericalTensor {
        SphericalTensor::new(1.0 / self.ii())
    }

    pub fn cof(&self) -> SphericalTensor {
        SphericalTensor::new(self.ii() * self.ii())
    }

    pub fn dot(&self, other: &SphericalTensor) -> SphericalTensor {
        SphericalTensor::new(self.ii() * other.ii())
    }

    pub fn diag(&self) -> Vector {
        Vector::uniform(self.ii())
    }
}
