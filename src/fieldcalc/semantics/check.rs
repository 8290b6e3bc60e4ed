//! Kind and domain checking
//!
//! The checker walks the untyped [`Expr`] tree once, top-down hints first and
//! bottom-up types second, and produces a [`Node`] tree in which every operand
//! kind, promotion and broadcast is explicit. Operand pairs that no operator
//! accepts are rejected here, before any field is touched.
//!
//! Hints flow from the context into sub-expressions. They only matter for
//! plugin calls, whose result type is chosen among their registrations, and
//! are otherwise advisory: the bottom-up type is what gets checked.

use super::builtins::{self, Builtin, MeshQuantity, Reduction, TensorFn};
use super::node::{LookupSource, Node, Op};
use super::types::{binary_result, promote_rank2, unary_result, ExprType, Shape};
use crate::fieldcalc::error::{ExprError, Result, Span};
use crate::fieldcalc::host::FieldSource;
use crate::fieldcalc::parser::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::fieldcalc::plugin::PluginRegistry;
use crate::fieldcalc::value::{Domain, FieldType, Value, ValueKind};

pub(crate) struct Checker<'a> {
    fields: &'a dyn FieldSource,
    plugins: &'a PluginRegistry,
    /// Domain for quantities that could live in either: `id()`, `rand()`,
    /// reductions of uniform values and plugin results.
    preferred: Domain,
}

impl<'a> Checker<'a> {
    pub fn new(
        fields: &'a dyn FieldSource,
        plugins: &'a PluginRegistry,
        preferred: Domain,
    ) -> Self {
        Self {
            fields,
            plugins,
            preferred,
        }
    }

    /// Check a whole expression against the type its start symbol demands.
    pub fn check_root(&self, expr: &Expr, expected: Option<FieldType>) -> Result<Node> {
        let node = self.check(expr, expected.map(|ft| ft.kind))?;
        let Some(expected) = expected else {
            return Ok(node);
        };

        let node = match promote_rank2(node.ty.kind, expected.kind) {
            Some(kind) if kind == expected.kind => widen(node, kind),
            _ => node,
        };
        let domain_fits = match node.ty.shape {
            Shape::Uniform => true,
            Shape::Field(domain) => domain == expected.domain,
        };
        if node.ty.kind == expected.kind && domain_fits {
            return Ok(node);
        }

        match &node.op {
            Op::Plugin {
                name, field_type, ..
            } => Err(ExprError::PluginTypeMismatch {
                name: name.clone(),
                expected,
                declared: field_type.to_string(),
            }),
            _ => Err(ExprError::kind_mismatch(expected, node.ty, node.span)),
        }
    }

    fn check(&self, expr: &Expr, hint: Option<ValueKind>) -> Result<Node> {
        let span = expr.span.clone();
        match &expr.kind {
            ExprKind::Number(v) => Ok(constant(Value::Scalar(*v), span)),
            ExprKind::Bool(b) => Ok(constant(Value::Logical(*b), span)),
            ExprKind::Ident(name) => self.identifier(name, span),
            ExprKind::Unary(op, operand) => self.unary(*op, operand, hint, span),
            ExprKind::Binary(op, left, right) => self.binary(*op, left, right, hint, span),
            ExprKind::Conditional(condition, when_true, when_false) => {
                self.conditional(condition, when_true, when_false, hint, span)
            }
            ExprKind::Component(operand, component) => {
                let inner = self.check(operand, None)?;
                let index = inner.ty.kind.component_index(component).ok_or_else(|| {
                    ExprError::kind_mismatch(
                        format!("a kind with component '{component}'"),
                        inner.ty.kind,
                        span.clone(),
                    )
                })?;
                let ty = inner.ty.with_kind(ValueKind::Scalar);
                Ok(Node::new(ty, span, Op::Component(Box::new(inner), index)))
            }
            ExprKind::Transpose(operand) => self.call(
                "T",
                Builtin::Tensor(TensorFn::Transpose),
                std::slice::from_ref(operand.as_ref()),
                hint,
                span,
            ),
            ExprKind::Call { name, args } => match builtins::resolve(name, args.len()) {
                Some(builtin) => self.call(name, builtin, args, hint, span),
                None => Err(ExprError::syntax(
                    format!("unknown function '{name}' taking {} argument(s)", args.len()),
                    span,
                    Some(name.clone()),
                )),
            },
            ExprKind::PluginCall {
                name,
                arguments,
                offset,
            } => self.plugin(name, arguments, *offset, hint, span),
        }
    }

    fn identifier(&self, name: &str, span: Span) -> Result<Node> {
        if name == "pi" {
            return Ok(constant(Value::Scalar(std::f64::consts::PI), span));
        }
        let field_type = self
            .fields
            .field_type(name)
            .ok_or_else(|| ExprError::UnknownField { name: name.into() })?;
        Ok(lookup(name, LookupSource::Current, field_type, span))
    }

    fn unary(
        &self,
        op: UnaryOp,
        operand: &Expr,
        hint: Option<ValueKind>,
        span: Span,
    ) -> Result<Node> {
        let operand_hint = match op {
            UnaryOp::Negate => hint,
            UnaryOp::Not => Some(ValueKind::Logical),
            UnaryOp::Hodge => None,
        };
        let inner = self.check(operand, operand_hint)?;
        let kind = unary_result(op, inner.ty.kind).ok_or_else(|| {
            ExprError::kind_mismatch(
                format!("operand valid for '{}'", op.symbol()),
                inner.ty.kind,
                span.clone(),
            )
        })?;
        let ty = inner.ty.with_kind(kind);
        Ok(Node::new(ty, span, Op::Unary(op, Box::new(inner))))
    }

    fn binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        hint: Option<ValueKind>,
        span: Span,
    ) -> Result<Node> {
        let (left_hint, right_hint) = operand_hints(op, hint);
        let left = self.check(left, left_hint)?;
        let right_hint = match op {
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::AndAnd
            | BinaryOp::Equal
            | BinaryOp::NotEqual => Some(left.ty.kind),
            _ => right_hint,
        };
        let right = self.check(right, right_hint)?;

        let (lk, rk) = (left.ty.kind, right.ty.kind);
        let kind = binary_result(op, lk, rk).ok_or_else(|| {
            ExprError::kind_mismatch(
                format!("operands valid for '{op}'"),
                format!("{lk} {op} {rk}"),
                span.clone(),
            )
        })?;
        let shape = left
            .ty
            .shape
            .merge(right.ty.shape)
            .ok_or_else(|| ExprError::kind_mismatch(left.ty, right.ty, span.clone()))?;

        let (left, right) = match op {
            BinaryOp::Add | BinaryOp::Subtract => (widen(left, kind), widen(right, kind)),
            BinaryOp::Dot
                if lk == ValueKind::SphericalTensor && rk == ValueKind::SphericalTensor =>
            {
                (left, right)
            }
            BinaryOp::Dot | BinaryOp::AndAnd => (widen_rank2(left), widen_rank2(right)),
            _ => (left, right),
        };
        Ok(Node::new(
            ExprType::new(kind, shape),
            span,
            Op::Binary(op, Box::new(left), Box::new(right)),
        ))
    }

    fn conditional(
        &self,
        condition: &Expr,
        when_true: &Expr,
        when_false: &Expr,
        hint: Option<ValueKind>,
        span: Span,
    ) -> Result<Node> {
        let condition = self.check(condition, Some(ValueKind::Logical))?;
        if condition.ty.kind != ValueKind::Logical {
            return Err(ExprError::kind_mismatch(
                ValueKind::Logical,
                condition.ty.kind,
                condition.span,
            ));
        }
        let when_true = self.check(when_true, hint)?;
        let when_false = self.check(when_false, hint.or(Some(when_true.ty.kind)))?;

        let (tk, fk) = (when_true.ty.kind, when_false.ty.kind);
        let kind = if tk == fk {
            tk
        } else {
            promote_rank2(tk, fk).ok_or_else(|| {
                ExprError::kind_mismatch(
                    format!("branches of one kind, {tk} on the true side"),
                    fk,
                    when_false.span.clone(),
                )
            })?
        };
        let shape = merge_shapes(&[&condition, &when_true, &when_false], &span)?;
        Ok(Node::new(
            ExprType::new(kind, shape),
            span,
            Op::Conditional(
                Box::new(condition),
                Box::new(widen(when_true, kind)),
                Box::new(widen(when_false, kind)),
            ),
        ))
    }

    fn plugin(
        &self,
        name: &str,
        arguments: &str,
        offset: usize,
        hint: Option<ValueKind>,
        span: Span,
    ) -> Result<Node> {
        let declared = self.plugins.declared_types(name);
        let accepts = |ft: &FieldType| match hint {
            None => true,
            Some(kind) => ft.kind == kind || (ft.kind.is_rank2() && kind.is_rank2()),
        };
        let chosen = declared.iter().copied().filter(accepts).min_by_key(|ft| {
            (
                hint.is_some_and(|kind| kind != ft.kind),
                ft.domain != self.preferred,
            )
        });

        let Some(field_type) = chosen else {
            return Err(ExprError::PluginTypeMismatch {
                name: name.into(),
                expected: FieldType::new(hint.unwrap_or(ValueKind::Scalar), self.preferred),
                declared: self.plugins.describe(name),
            });
        };

        Ok(Node::new(
            ExprType::field(field_type.kind, field_type.domain),
            span,
            Op::Plugin {
                name: name.into(),
                arguments: arguments.into(),
                offset,
                field_type,
            },
        ))
    }

    fn call(
        &self,
        name: &str,
        builtin: Builtin,
        args: &[Expr],
        hint: Option<ValueKind>,
        span: Span,
    ) -> Result<Node> {
        use ValueKind::*;

        match builtin {
            Builtin::Scalar(_) => {
                let arg = self.scalar_argument(&args[0])?;
                let ty = arg.ty;
                Ok(Node::new(ty, span, Op::Call(builtin, vec![arg])))
            }
            Builtin::Pow | Builtin::Atan2 => {
                let a = self.scalar_argument(&args[0])?;
                let b = self.scalar_argument(&args[1])?;
                let shape = merge_shapes(&[&a, &b], &span)?;
                Ok(Node::new(
                    ExprType::new(Scalar, shape),
                    span,
                    Op::Call(builtin, vec![a, b]),
                ))
            }
            Builtin::ElementMin | Builtin::ElementMax => {
                let a = self.check(&args[0], hint)?;
                let b = self.check(&args[1], Some(a.ty.kind))?;
                if a.ty.kind != b.ty.kind || !a.ty.kind.is_numeric() {
                    return Err(ExprError::kind_mismatch(
                        format!("two arguments of one numeric kind for '{name}'"),
                        format!("{} and {}", a.ty.kind, b.ty.kind),
                        span,
                    ));
                }
                let shape = merge_shapes(&[&a, &b], &span)?;
                Ok(Node::new(
                    ExprType::new(a.ty.kind, shape),
                    span,
                    Op::Call(builtin, vec![a, b]),
                ))
            }
            Builtin::Reduce(reduction) => self.reduction(name, reduction, &args[0], hint, span),
            Builtin::Tensor(f) => {
                let arg = self.check(&args[0], None)?;
                let (input, result) = tensor_rule(f, arg.ty.kind).ok_or_else(|| {
                    ExprError::kind_mismatch(
                        format!("argument valid for '{name}'"),
                        arg.ty.kind,
                        arg.span.clone(),
                    )
                })?;
                let ty = arg.ty.with_kind(result);
                Ok(Node::new(ty, span, Op::Call(builtin, vec![widen(arg, input)])))
            }
            Builtin::ComposeVector
            | Builtin::ComposeTensor
            | Builtin::ComposeSymmTensor
            | Builtin::ComposeSphericalTensor => {
                let kind = match builtin {
                    Builtin::ComposeVector => Vector,
                    Builtin::ComposeTensor => Tensor,
                    Builtin::ComposeSymmTensor => SymmTensor,
                    _ => SphericalTensor,
                };
                let parts = args
                    .iter()
                    .map(|arg| self.scalar_argument(arg))
                    .collect::<Result<Vec<_>>>()?;
                let refs: Vec<&Node> = parts.iter().collect();
                let shape = merge_shapes(&refs, &span)?;
                Ok(Node::new(
                    ExprType::new(kind, shape),
                    span,
                    Op::Call(builtin, parts),
                ))
            }
            Builtin::OldTime => {
                let field = identifier_argument(name, &args[0])?;
                let field_type = self
                    .fields
                    .field_type(field)
                    .ok_or_else(|| ExprError::UnknownField { name: field.into() })?;
                Ok(lookup(field, LookupSource::OldTime, field_type, span))
            }
            Builtin::Mapped => {
                let field = identifier_argument(name, &args[0])?;
                let region = args
                    .get(1)
                    .map(|arg| identifier_argument(name, arg))
                    .transpose()?;
                let field_type = self
                    .fields
                    .mapped_field_type(field, region)
                    .ok_or_else(|| ExprError::UnknownField { name: field.into() })?;
                let source = LookupSource::Mapped(region.map(String::from));
                Ok(lookup(field, source, field_type, span))
            }
            Builtin::ToPoint | Builtin::ToFace => {
                let (from, to) = if builtin == Builtin::ToPoint {
                    (Domain::Cell, Domain::Point)
                } else {
                    (Domain::Point, Domain::Cell)
                };
                let arg = self.check(&args[0], hint)?;
                if let Shape::Field(domain) = arg.ty.shape {
                    if domain != from {
                        return Err(ExprError::kind_mismatch(
                            ExprType::field(arg.ty.kind, from),
                            arg.ty,
                            arg.span,
                        ));
                    }
                }
                Ok(Node::new(
                    ExprType::field(arg.ty.kind, to),
                    span,
                    Op::Call(builtin, vec![arg]),
                ))
            }
            Builtin::Mesh(quantity) => {
                let ty = match quantity {
                    MeshQuantity::CellCentres
                    | MeshQuantity::FaceAreaVectors
                    | MeshQuantity::FaceNormals => ExprType::field(Vector, Domain::Cell),
                    MeshQuantity::FaceAreas => ExprType::field(Scalar, Domain::Cell),
                    MeshQuantity::PointCoordinates => ExprType::field(Vector, Domain::Point),
                    MeshQuantity::Index | MeshQuantity::Weights => {
                        ExprType::field(Scalar, self.preferred)
                    }
                    MeshQuantity::Time | MeshQuantity::DeltaT => ExprType::uniform(Scalar),
                };
                Ok(Node::new(ty, span, Op::Call(builtin, Vec::new())))
            }
            Builtin::Rand | Builtin::RandNormal => {
                let seed = args
                    .first()
                    .map(|arg| self.scalar_argument(arg))
                    .transpose()?;
                if let Some(seed) = &seed {
                    if seed.ty.shape != Shape::Uniform {
                        return Err(ExprError::kind_mismatch(
                            ExprType::uniform(Scalar),
                            seed.ty,
                            seed.span.clone(),
                        ));
                    }
                }
                Ok(Node::new(
                    ExprType::field(Scalar, self.preferred),
                    span,
                    Op::Call(builtin, seed.into_iter().collect()),
                ))
            }
        }
    }

    fn reduction(
        &self,
        name: &str,
        reduction: Reduction,
        arg: &Expr,
        hint: Option<ValueKind>,
        span: Span,
    ) -> Result<Node> {
        let arg_hint = match reduction {
            Reduction::SumMag | Reduction::Size => None,
            Reduction::MinPosition | Reduction::MaxPosition => Some(ValueKind::Scalar),
            _ => hint,
        };
        let arg = self.check(arg, arg_hint)?;
        let kind = arg.ty.kind;
        let result = match reduction {
            Reduction::Size => Some(ValueKind::Scalar),
            Reduction::SumMag => kind.is_numeric().then_some(ValueKind::Scalar),
            Reduction::MinPosition | Reduction::MaxPosition => {
                (kind == ValueKind::Scalar).then_some(ValueKind::Vector)
            }
            _ => kind.is_numeric().then_some(kind),
        };
        let result = result.ok_or_else(|| {
            ExprError::kind_mismatch(
                format!("argument valid for '{name}'"),
                kind,
                arg.span.clone(),
            )
        })?;

        let arg = match arg.ty.shape {
            Shape::Uniform => {
                let ty = ExprType::field(kind, self.preferred);
                let span = arg.span.clone();
                Node::new(ty, span, Op::Materialize(Box::new(arg), self.preferred))
            }
            Shape::Field(_) => arg,
        };
        Ok(Node::new(
            ExprType::uniform(result),
            span,
            Op::Call(Builtin::Reduce(reduction), vec![arg]),
        ))
    }

    fn scalar_argument(&self, arg: &Expr) -> Result<Node> {
        let node = self.check(arg, Some(ValueKind::Scalar))?;
        if node.ty.kind != ValueKind::Scalar {
            return Err(ExprError::kind_mismatch(
                ValueKind::Scalar,
                node.ty.kind,
                node.span,
            ));
        }
        Ok(node)
    }
}

fn constant(value: Value, span: Span) -> Node {
    Node::new(ExprType::uniform(value.kind()), span, Op::Constant(value))
}

fn lookup(name: &str, source: LookupSource, field_type: FieldType, span: Span) -> Node {
    Node::new(
        ExprType::field(field_type.kind, field_type.domain),
        span,
        Op::Lookup {
            name: name.into(),
            source,
            field_type,
        },
    )
}

fn identifier_argument<'e>(function: &str, arg: &'e Expr) -> Result<&'e str> {
    match &arg.kind {
        ExprKind::Ident(name) => Ok(name),
        _ => Err(ExprError::syntax(
            format!("'{function}' expects a field name"),
            arg.span.clone(),
            None,
        )),
    }
}

/// Insert a promotion when `node` is of a lower rank-2 kind than `kind`.
fn widen(node: Node, kind: ValueKind) -> Node {
    if node.ty.kind == kind {
        return node;
    }
    let ty = node.ty.with_kind(kind);
    let span = node.span.clone();
    Node::new(ty, span, Op::Promote(Box::new(node)))
}

fn widen_rank2(node: Node) -> Node {
    if node.ty.kind.is_rank2() {
        widen(node, ValueKind::Tensor)
    } else {
        node
    }
}

fn merge_shapes(nodes: &[&Node], span: &Span) -> Result<Shape> {
    let mut shape = Shape::Uniform;
    for node in nodes {
        shape = shape.merge(node.ty.shape).ok_or_else(|| {
            ExprError::kind_mismatch(ExprType::new(node.ty.kind, shape), node.ty, span.clone())
        })?;
    }
    Ok(shape)
}

fn operand_hints(
    op: BinaryOp,
    hint: Option<ValueKind>,
) -> (Option<ValueKind>, Option<ValueKind>) {
    let scalar = Some(ValueKind::Scalar);
    let logical = Some(ValueKind::Logical);
    match op {
        BinaryOp::Add | BinaryOp::Subtract => (hint, hint),
        BinaryOp::Divide => (hint, scalar),
        // a scalar product has scalar factors only
        BinaryOp::Multiply if hint == scalar => (scalar, scalar),
        BinaryOp::Modulo
        | BinaryOp::Less
        | BinaryOp::Greater
        | BinaryOp::LessEqual
        | BinaryOp::GreaterEqual => (scalar, scalar),
        BinaryOp::Cross => (Some(ValueKind::Vector), Some(ValueKind::Vector)),
        BinaryOp::AndAnd if hint == logical => (logical, logical),
        BinaryOp::Or => (logical, logical),
        BinaryOp::Multiply
        | BinaryOp::Dot
        | BinaryOp::AndAnd
        | BinaryOp::Equal
        | BinaryOp::NotEqual => (None, None),
    }
}

/// Kind the argument is widened to, and the result kind, of a one-argument
/// tensor function.
fn tensor_rule(f: TensorFn, kind: ValueKind) -> Option<(ValueKind, ValueKind)> {
    use ValueKind::*;

    let rank2 = kind.is_rank2();
    match f {
        TensorFn::Mag | TensorFn::MagSqr => kind.is_numeric().then_some((kind, Scalar)),
        TensorFn::Transpose | TensorFn::Inv | TensorFn::Cof => rank2.then_some((kind, kind)),
        TensorFn::Tr | TensorFn::Det => rank2.then_some((kind, Scalar)),
        TensorFn::Dev | TensorFn::Dev2 => match kind {
            Tensor | SymmTensor => Some((kind, kind)),
            SphericalTensor => Some((SymmTensor, SymmTensor)),
            _ => None,
        },
        TensorFn::Sph => rank2.then_some((kind, SphericalTensor)),
        TensorFn::Diag => rank2.then_some((kind, Vector)),
        TensorFn::Symm | TensorFn::TwoSymm => rank2.then_some((Tensor, SymmTensor)),
        TensorFn::Skew | TensorFn::EigenVectors => rank2.then_some((Tensor, Tensor)),
        TensorFn::EigenValues => rank2.then_some((Tensor, Vector)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldcalc::memory::MemoryCase;
    use crate::fieldcalc::parser::{parse_source, StartSymbol};
    use crate::fieldcalc::value::{Field, SymmTensor, Tensor, Vector};

    fn case() -> MemoryCase {
        MemoryCase::new()
            .with_cells(vec![Vector::zero(); 2])
            .with_field("p", Field::scalar(Domain::Cell, vec![1.0, 2.0]))
            .with_field("U", Field::vector(Domain::Cell, vec![Vector::zero(); 2]))
            .with_field("T", Field::tensor(Domain::Cell, vec![Tensor::zero(); 2]))
            .with_field("S", Field::symm_tensor(Domain::Cell, vec![SymmTensor::zero(); 2]))
            .with_field("q", Field::scalar(Domain::Point, vec![]))
    }

    fn check(source: &str) -> Result<Node> {
        let case = case();
        let plugins = PluginRegistry::new();
        let parsed = parse_source(source, &StartSymbol::Default, |name| plugins.contains(name))?;
        let expr = parsed.expr.ok_or_else(|| ExprError::syntax("empty", 0..0, None))?;
        Checker::new(&case, &plugins, Domain::Cell).check_root(&expr, None)
    }

    fn type_of(source: &str) -> ExprType {
        check(source).expect("expression to check").ty
    }

    #[test]
    fn test_literal_and_field_types() {
        assert_eq!(type_of("1"), ExprType::uniform(ValueKind::Scalar));
        assert_eq!(type_of("true"), ExprType::uniform(ValueKind::Logical));
        assert_eq!(type_of("pi"), ExprType::uniform(ValueKind::Scalar));
        assert_eq!(type_of("U"), ExprType::field(ValueKind::Vector, Domain::Cell));
        assert_eq!(type_of("U.y"), ExprType::field(ValueKind::Scalar, Domain::Cell));
    }

    #[test]
    fn test_operator_results() {
        assert_eq!(type_of("U & U").kind, ValueKind::Scalar);
        assert_eq!(type_of("U * U").kind, ValueKind::Tensor);
        assert_eq!(type_of("T & U").kind, ValueKind::Vector);
        assert_eq!(type_of("T && S").kind, ValueKind::Scalar);
        assert_eq!(type_of("S + T").kind, ValueKind::Tensor);
        assert_eq!(type_of("p > 1 && p < 2").kind, ValueKind::Logical);
        assert_eq!(type_of("*U").kind, ValueKind::Tensor);
    }

    #[test]
    fn test_promotion_is_explicit() {
        let node = check("S + T").expect("sum to check");
        let Op::Binary(_, left, _) = node.op else {
            panic!("expected a binary node");
        };
        assert!(matches!(left.op, Op::Promote(_)));
        assert_eq!(left.ty.kind, ValueKind::Tensor);
    }

    #[test]
    fn test_reductions_are_uniform() {
        assert_eq!(type_of("max(p)"), ExprType::uniform(ValueKind::Scalar));
        assert_eq!(type_of("sum(U)"), ExprType::uniform(ValueKind::Vector));
        assert_eq!(type_of("minPosition(p)"), ExprType::uniform(ValueKind::Vector));
        assert_eq!(type_of("p - average(p)").shape, Shape::Field(Domain::Cell));
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(check("T + U"), Err(ExprError::KindMismatch { .. })));
        assert!(matches!(check("p ? 1 : 2"), Err(ExprError::KindMismatch { .. })));
        assert!(matches!(check("U.xx"), Err(ExprError::KindMismatch { .. })));
        assert!(matches!(check("p + q"), Err(ExprError::KindMismatch { .. })));
        assert!(matches!(check("minPosition(U)"), Err(ExprError::KindMismatch { .. })));
        assert!(matches!(check("nope"), Err(ExprError::UnknownField { .. })));
        assert!(matches!(check("frobnicate(p)"), Err(ExprError::Syntax { .. })));
    }

    #[test]
    fn test_typed_root_spreads_and_widens() {
        let case = case();
        let plugins = PluginRegistry::new();
        let checker = Checker::new(&case, &plugins, Domain::Cell);
        let expr = parse_source("S", &StartSymbol::Default, |_| false)
            .expect("parse")
            .expr
            .expect("expression");
        let node = checker
            .check_root(&expr, Some(FieldType::cell(ValueKind::Tensor)))
            .expect("symmTensor widens to tensor");
        assert_eq!(node.ty.kind, ValueKind::Tensor);

        let err = checker.check_root(&expr, Some(FieldType::point(ValueKind::SymmTensor)));
        assert!(matches!(err, Err(ExprError::KindMismatch { .. })));
    }
}
