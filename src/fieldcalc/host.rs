//! Interfaces to the host simulator
//!
//! The evaluator never owns mesh or field storage. It asks a [`Mesh`] for
//! geometry and interpolation, a [`FieldSource`] for named fields, and a
//! [`Collective`] to combine reductions across partitions.

use crate::fieldcalc::error::Result;
use crate::fieldcalc::value::{Domain, Field, FieldType, ValueKind, Vector};

/// Geometry and time information of the mesh an expression runs on.
pub trait Mesh {
    fn cell_count(&self) -> usize;

    fn point_count(&self) -> usize;

    fn cell_centres(&self) -> Vec<Vector>;

    fn point_coordinates(&self) -> Vec<Vector>;

    /// Face area vectors, one per cell-domain element.
    fn face_areas(&self) -> Vec<Vector>;

    /// Unit face normals, one per cell-domain element.
    fn face_normals(&self) -> Vec<Vector>;

    fn current_time(&self) -> f64;

    fn delta_t(&self) -> f64;

    /// Interpolate a cell field to the points, keeping its kind.
    fn interpolate_to_point(&self, field: &Field) -> Result<Field>;

    /// Interpolate a point field to the cells, keeping its kind.
    fn interpolate_to_cell(&self, field: &Field) -> Result<Field>;

    /// Name of the region, used to key cached plugin models.
    fn region_name(&self) -> &str {
        "region0"
    }

    /// Geometric weights used by `weightedAverage` and `weight()`.
    fn weights(&self, domain: Domain) -> Vec<f64> {
        vec![1.0; self.domain_size(domain)]
    }

    fn domain_size(&self, domain: Domain) -> usize {
        match domain {
            Domain::Cell => self.cell_count(),
            Domain::Point => self.point_count(),
        }
    }
}

/// Name to field resolution. `None` means not found.
pub trait FieldSource {
    /// Kind and domain of the current field called `name`.
    fn field_type(&self, name: &str) -> Option<FieldType>;

    fn lookup(&self, name: &str, kind: ValueKind, domain: Domain) -> Option<Field>;

    /// The value `name` held one time step earlier.
    fn lookup_old_time(&self, name: &str, kind: ValueKind, domain: Domain) -> Option<Field>;

    /// Kind and domain of `name` as mapped from another region. Defaults to
    /// the type of the current field of the same name.
    fn mapped_field_type(&self, name: &str, _source_region: Option<&str>) -> Option<FieldType> {
        self.field_type(name)
    }

    /// `name` interpolated from another region. Without `source_region` the
    /// host picks the region.
    fn lookup_mapped(
        &self,
        name: &str,
        kind: ValueKind,
        domain: Domain,
        source_region: Option<&str>,
    ) -> Option<Field>;
}

/// All-reduce primitives for distributed runs.
///
/// The defaults describe a single partition. Implementations combine the local
/// partial result with those of every other partition; the order in which
/// partial sums are added is up to the implementation, so results need not be
/// bit-identical across decompositions.
pub trait Collective {
    fn sum(&self, local: f64) -> f64 {
        local
    }

    fn min(&self, local: f64) -> f64 {
        local
    }

    fn max(&self, local: f64) -> f64 {
        local
    }

    fn count(&self, local: usize) -> usize {
        local
    }

    /// Pick the global minimum among per-partition `(value, position)` candidates.
    fn min_location(&self, local: (f64, Vector)) -> (f64, Vector) {
        local
    }

    /// Pick the global maximum among per-partition `(value, position)` candidates.
    fn max_location(&self, local: (f64, Vector)) -> (f64, Vector) {
        local
    }
}

/// A run with one partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serial;

impl Collective for Serial {}
