//! End-to-end evaluation against an in-memory case

mod common;

use common::{cell_scalars, three_cells};
use fieldcalc::{
    Domain, Evaluator, ExprError, ExpressionResult, Field, FieldType, MemoryCase, StartSymbol,
    SymmTensor, Tensor, Value, ValueKind, Vector,
};
use fieldcalc_config::Loader;
use rstest::rstest;

fn cell(kind: ValueKind) -> StartSymbol {
    StartSymbol::Typed(FieldType::cell(kind))
}

#[test]
fn magnitude_of_a_vector_field() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate("2*mag(U)", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(result), vec![2.0, 4.0, 6.0]);
}

#[test]
fn conditional_selects_per_element() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate("p > 5 ? p : 0", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(result), vec![0.0, 7.0, 0.0]);
}

#[test]
fn conditional_over_field_branches() {
    let case = three_cells()
        .with_field("a", Field::scalar(Domain::Cell, vec![1.0, 2.0, 3.0]))
        .with_field("b", Field::scalar(Domain::Cell, vec![10.0, 20.0, 30.0]))
        .with_field("c", Field::logical(Domain::Cell, vec![true, false, true]));
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate("c ? a : b", StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(cell_scalars(result), vec![1.0, 20.0, 3.0]);
}

#[test]
fn operands_of_different_length_are_rejected() {
    let case = three_cells().with_field(
        "V",
        Field::vector(Domain::Cell, vec![Vector::new(1.0, 1.0, 1.0); 4]),
    );
    let evaluator = Evaluator::new(&case, &case);
    let err = evaluator
        .evaluate("U & V", StartSymbol::Default)
        .expect_err("sizes disagree");
    match err {
        ExprError::SizeMismatch { left, right } => {
            assert_eq!((left.min(right), left.max(right)), (3, 4));
        }
        other => panic!("expected a size mismatch, got {other:?}"),
    }
}

#[test]
fn reductions_answer_single_values() {
    let case = three_cells().with_field("q", Field::scalar(Domain::Cell, vec![3.0, 1.0, 2.0]));
    let evaluator = Evaluator::new(&case, &case);

    let position = evaluator
        .evaluate("minPosition(q)", StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(
        position,
        ExpressionResult::Single(Value::Vector(Vector::new(1.0, 0.0, 0.0)))
    );

    let max = evaluator
        .evaluate("max(p)", StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(max.as_single(), Some(Value::Scalar(7.0)));

    let size = evaluator
        .evaluate("size(p)", StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(size.as_single(), Some(Value::Scalar(3.0)));
}

#[test]
fn reductions_mix_with_fields() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate("p - max(p)", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(result), vec![-6.0, 0.0, -4.0]);
}

#[test]
fn compose_and_extract_components() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let rebuilt = evaluator
        .evaluate("vector(U.x, U.y, U.z)", cell(ValueKind::Vector))
        .expect("evaluation")
        .into_field()
        .expect("a field");
    assert_eq!(Some(&rebuilt), case.fields.get("U"));

    let y = evaluator
        .evaluate("U.y", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(y), vec![0.0, 2.0, 0.0]);
}

#[test]
fn empty_domain_evaluates_to_empty_fields() {
    let case = MemoryCase::new()
        .with_cells(vec![])
        .with_field("U", Field::vector(Domain::Cell, vec![]));
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate("vector(U.x, U.y, U.z) * 2", cell(ValueKind::Vector))
        .expect("evaluation")
        .into_field()
        .expect("a field");
    assert!(result.is_empty());
    assert_eq!(result.field_type(), FieldType::cell(ValueKind::Vector));
}

#[rstest]
#[case("U + U", Some(ValueKind::Vector))]
#[case("U & U", Some(ValueKind::Scalar))]
#[case("U ^ U", Some(ValueKind::Vector))]
#[case("U * U", Some(ValueKind::Tensor))]
#[case("T & U", Some(ValueKind::Vector))]
#[case("S + T", Some(ValueKind::Tensor))]
#[case("S && T", Some(ValueKind::Scalar))]
#[case("sph(T) & sph(T)", Some(ValueKind::SphericalTensor))]
#[case("p > 1 || false", Some(ValueKind::Logical))]
#[case("T + U", None)]
#[case("p / U", None)]
#[case("!p", None)]
#[case("U < U", None)]
fn operator_result_kinds(#[case] source: &str, #[case] expected: Option<ValueKind>) {
    let case = three_cells()
        .with_field("T", Field::tensor(Domain::Cell, vec![Tensor::identity(); 3]))
        .with_field("S", Field::symm_tensor(Domain::Cell, vec![SymmTensor::zero(); 3]));
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator.evaluate(source, StartSymbol::Default);
    match expected {
        Some(kind) => assert_eq!(result.expect(source).kind(), kind, "{source}"),
        None => assert!(
            matches!(result, Err(ExprError::KindMismatch { .. })),
            "{source} should be rejected, got {result:?}"
        ),
    }
}

#[rstest]
#[case("-7 % 3", -1.0)]
#[case("7 % -3", 1.0)]
#[case("7.5 % 2", 1.5)]
fn modulo_keeps_the_sign_of_the_dividend(#[case] source: &str, #[case] expected: f64) {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate(source, StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(result, ExpressionResult::Single(Value::Scalar(expected)));
}

#[test]
fn cell_values_interpolate_to_points() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate("toPoint(p)", StartSymbol::Typed(FieldType::point(ValueKind::Scalar)))
        .expect("evaluation");
    assert_eq!(cell_scalars(result), vec![1.0, 4.0, 5.0, 3.0]);
}

#[test]
fn old_time_values() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate("p - oldTime(p)", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(result), vec![0.0, 2.0, -1.0]);

    let err = evaluator
        .evaluate("oldTime(U)", StartSymbol::Default)
        .expect_err("no old time for U");
    assert!(matches!(err, ExprError::UnknownField { .. }));
}

#[test]
fn mapped_values_from_another_region() {
    let case = three_cells().with_mapped(
        "solid",
        "T",
        Field::scalar(Domain::Cell, vec![300.0, 310.0, 320.0]),
    );
    let evaluator = Evaluator::new(&case, &case);
    let named = evaluator
        .evaluate("mapped(T, solid) - 300", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(named), vec![0.0, 10.0, 20.0]);

    let any = evaluator
        .evaluate("mapped(T)", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(any), vec![300.0, 310.0, 320.0]);
}

#[test]
fn mesh_quantities() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);

    let time = evaluator
        .evaluate("time()", StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(time.as_single(), Some(Value::Scalar(0.5)));

    let ids = evaluator
        .evaluate("id()", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(ids), vec![0.0, 1.0, 2.0]);

    let areas = evaluator
        .evaluate("area()", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(areas), vec![2.0, 3.0, 4.0]);

    let x = evaluator
        .evaluate("pos().x", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(x), vec![0.0, 1.0, 2.0]);
}

#[test]
fn random_fields_are_reproducible() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let first = evaluator
        .evaluate("rand()", cell(ValueKind::Scalar))
        .expect("evaluation");
    let second = evaluator
        .evaluate("rand()", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(first, second);

    let values = cell_scalars(first);
    assert!(values.iter().all(|v| (0.0..1.0).contains(v)));

    let same = evaluator
        .evaluate("rand() == rand()", cell(ValueKind::Logical))
        .expect("evaluation")
        .into_field()
        .expect("a field");
    assert!(same.as_logicals().expect("logicals").iter().any(|equal| !equal));
}

#[test]
fn non_finite_results_follow_the_numerics_setting() {
    let case = three_cells();

    let lenient = Evaluator::new(&case, &case);
    let result = lenient
        .evaluate("log(p - p)", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert!(result.has_non_finite());

    let config = Loader::new()
        .set_override("evaluation.strict_numerics", true)
        .expect("override")
        .build()
        .expect("configuration");
    assert!(config.evaluation.strict_numerics);
    let strict = Evaluator::new(&case, &case).with_config(config);
    let err = strict
        .evaluate("log(p - p)", cell(ValueKind::Scalar))
        .expect_err("strict numerics");
    assert!(matches!(err, ExprError::UndefinedNumericResult { .. }));
}

#[test]
fn typed_start_rejects_the_wrong_kind() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let err = evaluator
        .evaluate("U", cell(ValueKind::Scalar))
        .expect_err("vector is not a scalar");
    insta::assert_snapshot!(
        err.to_string(),
        @"expected cell scalar field, found cell vector field at 0..1"
    );
}

#[test]
fn syntax_errors_point_at_the_offending_token() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);
    let err = evaluator
        .evaluate("p + / 2", StartSymbol::Default)
        .expect_err("incomplete expression");
    let span = err.span().expect("syntax errors carry a span");
    assert!(span.start >= 2, "{err}");

    let err = evaluator
        .evaluate("nope + 1", StartSymbol::Default)
        .expect_err("unknown field");
    assert_eq!(
        err,
        ExprError::UnknownField {
            name: "nope".into()
        }
    );
}

#[test]
fn extrema_beyond_the_empty_sentinel() {
    let case = three_cells()
        .with_field("huge", Field::scalar(Domain::Cell, vec![3e300, 2e300, 4e300]))
        .with_field("low", Field::scalar(Domain::Cell, vec![f64::NEG_INFINITY; 3]))
        .with_field("high", Field::scalar(Domain::Cell, vec![f64::INFINITY; 3]));
    let evaluator = Evaluator::new(&case, &case);
    let single = |source: &str| {
        evaluator
            .evaluate(source, StartSymbol::Default)
            .expect(source)
            .as_single()
    };

    assert_eq!(single("min(huge)"), Some(Value::Scalar(2e300)));
    assert_eq!(single("max(huge)"), Some(Value::Scalar(4e300)));
    assert_eq!(single("max(low)"), Some(Value::Scalar(f64::NEG_INFINITY)));
    assert_eq!(
        single("minPosition(high)"),
        Some(Value::Vector(Vector::new(0.0, 0.0, 0.0)))
    );
    assert_eq!(
        single("maxPosition(huge)"),
        Some(Value::Vector(Vector::new(2.0, 0.0, 0.0)))
    );
}

#[test]
fn extrema_of_empty_fields() {
    let case = MemoryCase::new()
        .with_cells(vec![])
        .with_field("q", Field::scalar(Domain::Cell, vec![]));
    let evaluator = Evaluator::new(&case, &case);
    let single = |source: &str| {
        evaluator
            .evaluate(source, StartSymbol::Default)
            .expect(source)
            .as_single()
    };
    assert_eq!(single("min(q)"), Some(Value::Scalar(1e300)));
    assert_eq!(single("max(q)"), Some(Value::Scalar(-1e300)));
    assert_eq!(single("average(q)"), Some(Value::Scalar(0.0)));
}

#[test]
fn power_with_field_and_single_exponents() {
    let case = three_cells();
    let evaluator = Evaluator::new(&case, &case);

    let squared = evaluator
        .evaluate("pow(p, 2)", cell(ValueKind::Scalar))
        .expect("single exponent");
    assert_eq!(cell_scalars(squared), vec![1.0, 49.0, 9.0]);

    let own = evaluator
        .evaluate("pow(p, p)", cell(ValueKind::Scalar))
        .expect("field exponent");
    assert_eq!(cell_scalars(own), vec![1.0, 823543.0, 27.0]);

    let base = evaluator
        .evaluate("pow(2, p)", cell(ValueKind::Scalar))
        .expect("single base");
    assert_eq!(cell_scalars(base), vec![2.0, 128.0, 8.0]);

    let err = evaluator
        .evaluate("pow(p, U)", cell(ValueKind::Scalar))
        .expect_err("vector exponent");
    assert!(matches!(err, ExprError::KindMismatch { .. }), "{err:?}");
}

#[test]
fn point_values_average_onto_cells() {
    let case =
        three_cells().with_field("q", Field::scalar(Domain::Point, vec![0.0, 2.0, 4.0, 6.0]));
    let evaluator = Evaluator::new(&case, &case);
    let faces = evaluator
        .evaluate("toFace(q)", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(faces), vec![1.0, 3.0, 5.0]);

    let round_trip = evaluator
        .evaluate("toFace(toPoint(p))", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(cell_scalars(round_trip), vec![2.5, 4.5, 4.0]);

    let err = evaluator
        .evaluate("toFace(p)", cell(ValueKind::Scalar))
        .expect_err("cell values cannot move to cells");
    assert!(matches!(err, ExprError::KindMismatch { .. }), "{err:?}");
}

#[test]
fn normal_random_fields() {
    let centres: Vec<Vector> = (0..2000).map(|i| Vector::new(i as f64, 0.0, 0.0)).collect();
    let case = MemoryCase::new().with_cells(centres);
    let evaluator = Evaluator::new(&case, &case);

    let seeded = evaluator
        .evaluate("randNormal(7)", cell(ValueKind::Scalar))
        .expect("evaluation");
    let again = evaluator
        .evaluate("randNormal(7)", cell(ValueKind::Scalar))
        .expect("evaluation");
    assert_eq!(seeded, again);

    let values = cell_scalars(seeded);
    assert_eq!(values.len(), 2000);
    assert!(values.iter().all(|v| v.is_finite()));
    assert!(values.iter().any(|v| *v < 0.0));
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    assert!(mean.abs() < 0.15, "mean {mean}");
    assert!((variance - 1.0).abs() < 0.2, "variance {variance}");
}

#[test]
fn weighted_and_magnitude_reductions() {
    let case = three_cells().with_cell_volumes(vec![1.0, 0.0, 1.0]);
    let evaluator = Evaluator::new(&case, &case);

    let weighted = evaluator
        .evaluate("weightedAverage(p)", StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(weighted.as_single(), Some(Value::Scalar(2.0)));

    let total = evaluator
        .evaluate("sumMag(U)", StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(total.as_single(), Some(Value::Scalar(6.0)));

    let signed = evaluator
        .evaluate("sumMag(p - 4)", StartSymbol::Default)
        .expect("evaluation");
    assert_eq!(signed.as_single(), Some(Value::Scalar(7.0)));
}

#[test]
fn eigen_values_are_ascending() {
    let case = three_cells().with_field(
        "S",
        Field::symm_tensor(
            Domain::Cell,
            vec![SymmTensor([3.0, 0.0, 0.0, 1.0, 0.0, 2.0]); 3],
        ),
    );
    let evaluator = Evaluator::new(&case, &case);
    let result = evaluator
        .evaluate("eigenValues(S)", cell(ValueKind::Vector))
        .expect("evaluation")
        .into_field()
        .expect("a field");
    let values = result.as_vectors().expect("vectors");
    assert_eq!(values.len(), 3);
    for v in values {
        for (got, want) in v.0.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-12, "{v:?}");
        }
    }
}
