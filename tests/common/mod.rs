//! Shared fixtures for the integration tests

#![allow(dead_code)]

use fieldcalc::{Domain, Field, MemoryCase, Vector};

/// Three cells on the x axis, four points, with the fields most tests use.
pub fn three_cells() -> MemoryCase {
    MemoryCase::new()
        .with_region("fluid")
        .with_time(0.5, 0.1)
        .with_cells(vec![
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(2.0, 0.0, 0.0),
        ])
        .with_points(vec![
            Vector::new(-0.5, 0.0, 0.0),
            Vector::new(0.5, 0.0, 0.0),
            Vector::new(1.5, 0.0, 0.0),
            Vector::new(2.5, 0.0, 0.0),
        ])
        .with_cell_points(vec![vec![0, 1], vec![1, 2], vec![2, 3]])
        .with_face_area_vectors(vec![
            Vector::new(0.0, 0.0, 2.0),
            Vector::new(3.0, 0.0, 0.0),
            Vector::new(0.0, 4.0, 0.0),
        ])
        .with_field("p", Field::scalar(Domain::Cell, vec![1.0, 7.0, 3.0]))
        .with_field(
            "U",
            Field::vector(
                Domain::Cell,
                vec![
                    Vector::new(1.0, 0.0, 0.0),
                    Vector::new(0.0, 2.0, 0.0),
                    Vector::new(0.0, 0.0, 3.0),
                ],
            ),
        )
        .with_old_time("p", Field::scalar(Domain::Cell, vec![1.0, 5.0, 4.0]))
}

pub fn cell_scalars(result: fieldcalc::ExpressionResult) -> Vec<f64> {
    result
        .into_field()
        .and_then(|f| f.as_scalars().map(<[f64]>::to_vec))
        .expect("a scalar field")
}
