//! In-memory mesh and field table
//!
//! [`MemoryCase`] implements [`Mesh`] and [`FieldSource`] over plain vectors.
//! It is what tests and small embedders evaluate against, and it can be loaded
//! from YAML or JSON:
//!
//! ```yaml
//! region: fluid
//! time: 0.5
//! delta_t: 0.01
//! cell_centres: [[0, 0, 0], [1, 0, 0]]
//! fields:
//!   p:
//!     domain: cell
//!     values:
//!       scalar: [1.0, 2.0]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::fieldcalc::error::{ExprError, Result};
use crate::fieldcalc::host::{FieldSource, Mesh};
use crate::fieldcalc::value::{Domain, Field, FieldType, Primitive, ValueKind, Vector};

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("invalid YAML case: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON case: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inconsistent case: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCase {
    pub region: String,
    pub time: f64,
    pub delta_t: f64,
    pub cell_centres: Vec<Vector>,
    pub points: Vec<Vector>,
    /// Face area vectors, one per cell. Empty means all zero.
    pub face_area_vectors: Vec<Vector>,
    /// Point indices of every cell, used for interpolation between domains.
    pub cell_points: Vec<Vec<usize>>,
    /// Weights of the cell domain. Empty means unit weights.
    pub cell_volumes: Vec<f64>,
    pub fields: BTreeMap<String, Field>,
    pub old_time: BTreeMap<String, Field>,
    /// Fields of other regions, by region name.
    pub mapped: BTreeMap<String, BTreeMap<String, Field>>,
}

impl Default for MemoryCase {
    fn default() -> Self {
        Self {
            region: "region0".to_string(),
            time: 0.0,
            delta_t: 1.0,
            cell_centres: Vec::new(),
            points: Vec::new(),
            face_area_vectors: Vec::new(),
            cell_points: Vec::new(),
            cell_volumes: Vec::new(),
            fields: BTreeMap::new(),
            old_time: BTreeMap::new(),
            mapped: BTreeMap::new(),
        }
    }
}

impl MemoryCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(source: &str) -> std::result::Result<Self, CaseError> {
        let case: MemoryCase = serde_yaml::from_str(source)?;
        case.validate()?;
        Ok(case)
    }

    pub fn from_json_str(source: &str) -> std::result::Result<Self, CaseError> {
        let case: MemoryCase = serde_json::from_str(source)?;
        case.validate()?;
        Ok(case)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_time(mut self, time: f64, delta_t: f64) -> Self {
        self.time = time;
        self.delta_t = delta_t;
        self
    }

    /// Set the cells by their centres.
    pub fn with_cells(mut self, centres: Vec<Vector>) -> Self {
        self.cell_centres = centres;
        self
    }

    pub fn with_points(mut self, points: Vec<Vector>) -> Self {
        self.points = points;
        self
    }

    pub fn with_cell_points(mut self, cell_points: Vec<Vec<usize>>) -> Self {
        self.cell_points = cell_points;
        self
    }

    pub fn with_face_area_vectors(mut self, areas: Vec<Vector>) -> Self {
        self.face_area_vectors = areas;
        self
    }

    pub fn with_cell_volumes(mut self, volumes: Vec<f64>) -> Self {
        self.cell_volumes = volumes;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn with_old_time(mut self, name: impl Into<String>, field: Field) -> Self {
        self.old_time.insert(name.into(), field);
        self
    }

    pub fn with_mapped(
        mut self,
        region: impl Into<String>,
        name: impl Into<String>,
        field: Field,
    ) -> Self {
        self.mapped
            .entry(region.into())
            .or_default()
            .insert(name.into(), field);
        self
    }

    /// Check that every field and table matches the mesh sizes.
    pub fn validate(&self) -> std::result::Result<(), CaseError> {
        let sized = |what: &str, len: usize, expected: usize| {
            if len == expected {
                Ok(())
            } else {
                Err(CaseError::Invalid(format!(
                    "{what} has {len} entries, the mesh has {expected}"
                )))
            }
        };

        let cells = self.cell_count();
        if !self.face_area_vectors.is_empty() {
            sized("face_area_vectors", self.face_area_vectors.len(), cells)?;
        }
        if !self.cell_volumes.is_empty() {
            sized("cell_volumes", self.cell_volumes.len(), cells)?;
        }
        if !self.cell_points.is_empty() {
            sized("cell_points", self.cell_points.len(), cells)?;
            let points = self.point_count();
            if let Some(bad) = self.cell_points.iter().flatten().find(|&&p| p >= points) {
                return Err(CaseError::Invalid(format!(
                    "cell_points refers to point {bad} of {points}"
                )));
            }
        }

        let tables = [("fields", &self.fields), ("old_time", &self.old_time)];
        let mapped = self.mapped.iter().map(|(region, table)| (region.as_str(), table));
        for (table, entries) in tables.into_iter().chain(mapped) {
            for (name, field) in entries {
                sized(
                    &format!("{table} entry '{name}'"),
                    field.len(),
                    self.domain_size(field.domain()),
                )?;
            }
        }
        Ok(())
    }

    fn require_adjacency(&self) -> Result<()> {
        if self.cell_points.len() != self.cell_count() {
            return Err(ExprError::Host {
                message: format!("region '{}' has no cell-point adjacency", self.region),
            });
        }
        let points = self.point_count();
        match self.cell_points.iter().flatten().find(|&&p| p >= points) {
            Some(p) => Err(ExprError::Host {
                message: format!("region '{}' references point {p} of {points}", self.region),
            }),
            None => Ok(()),
        }
    }

    fn require_domain(field: &Field, domain: Domain) -> Result<()> {
        if field.domain() == domain {
            Ok(())
        } else {
            Err(ExprError::Host {
                message: format!(
                    "cannot interpolate a {} from the {domain} domain",
                    field.field_type()
                ),
            })
        }
    }
}

impl Mesh for MemoryCase {
    fn cell_count(&self) -> usize {
        self.cell_centres.len()
    }

    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn cell_centres(&self) -> Vec<Vector> {
        self.cell_centres.clone()
    }

    fn point_coordinates(&self) -> Vec<Vector> {
        self.points.clone()
    }

    fn face_areas(&self) -> Vec<Vector> {
        if self.face_area_vectors.is_empty() {
            vec![Vector::zero(); self.cell_count()]
        } else {
            self.face_area_vectors.clone()
        }
    }

    fn face_normals(&self) -> Vec<Vector> {
        self.face_areas()
            .into_iter()
            .map(|area| {
                let mag = area.mag();
                if mag > 0.0 {
                    area / mag
                } else {
                    area
                }
            })
            .collect()
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// Average of the cells sharing each point.
    fn interpolate_to_point(&self, field: &Field) -> Result<Field> {
        Self::require_domain(field, Domain::Cell)?;
        self.require_adjacency()?;
        let mut groups = vec![Vec::new(); self.point_count()];
        for (cell, points) in self.cell_points.iter().enumerate() {
            for &point in points {
                groups[point].push(cell);
            }
        }
        Ok(Field::new(Domain::Point, field.values().average_groups(&groups)))
    }

    /// Average of the points of each cell.
    fn interpolate_to_cell(&self, field: &Field) -> Result<Field> {
        Self::require_domain(field, Domain::Point)?;
        self.require_adjacency()?;
        Ok(Field::new(
            Domain::Cell,
            field.values().average_groups(&self.cell_points),
        ))
    }

    fn region_name(&self) -> &str {
        &self.region
    }

    fn weights(&self, domain: Domain) -> Vec<f64> {
        match domain {
            Domain::Cell if !self.cell_volumes.is_empty() => self.cell_volumes.clone(),
            _ => vec![1.0; self.domain_size(domain)],
        }
    }
}

impl FieldSource for MemoryCase {
    fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(Field::field_type)
    }

    /// Answers the stored field whatever its type; the evaluator reports a
    /// disagreement with the requested type.
    fn lookup(&self, name: &str, _kind: ValueKind, _domain: Domain) -> Option<Field> {
        self.fields.get(name).cloned()
    }

    fn lookup_old_time(&self, name: &str, _kind: ValueKind, _domain: Domain) -> Option<Field> {
        self.old_time.get(name).cloned()
    }

    fn mapped_field_type(&self, name: &str, source_region: Option<&str>) -> Option<FieldType> {
        self.mapped_field(name, source_region).map(Field::field_type)
    }

    fn lookup_mapped(
        &self,
        name: &str,
        _kind: ValueKind,
        _domain: Domain,
        source_region: Option<&str>,
    ) -> Option<Field> {
        self.mapped_field(name, source_region).cloned()
    }
}

impl MemoryCase {
    /// A mapped field from the named region, or from the first region that
    /// has one of that name.
    fn mapped_field(&self, name: &str, source_region: Option<&str>) -> Option<&Field> {
        match source_region {
            Some(region) => self.mapped.get(region)?.get(name),
            None => self.mapped.values().find_map(|table| table.get(name)),
        }
    }
}
