//! Bottom-up evaluation of a checked node tree
//!
//! The [`Interpreter`] consumes a [`Node`] by value. Each child result is an
//! owned [`Operand`] that is moved into its parent's operation and dropped
//! there, so no intermediate field outlives the node that produced it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing::trace;

use super::builtins::{Builtin, MeshQuantity, Reduction, TensorFn};
use super::node::{LookupSource, Node, Op};
use super::numeric::modulo;
use super::operand::Operand;
use super::reduce;
use super::types::ExprType;
use crate::fieldcalc::error::{ExprError, Result, Span};
use crate::fieldcalc::host::{Collective, FieldSource, Mesh};
use crate::fieldcalc::parser::{BinaryOp, UnaryOp};
use crate::fieldcalc::value::{
    Column, Domain, Field, FieldType, Primitive, SphericalTensor, SymmTensor, Tensor, Value,
    ValueKind, Vector,
};

/// Everything evaluation needs from outside the node tree.
pub(crate) trait Environment {
    fn mesh(&self) -> &dyn Mesh;

    fn fields(&self) -> &dyn FieldSource;

    fn collective(&self) -> &dyn Collective;

    /// Base seed for `rand()` and `randNormal()` without an explicit seed.
    fn seed(&self) -> u64;

    fn call_plugin(
        &self,
        name: &str,
        arguments: &str,
        offset: usize,
        field_type: FieldType,
    ) -> Result<Field>;
}

/// Apply `$body` to the column of any numeric operand, keeping its kind.
macro_rules! map_numeric {
    ($operand:expr, $c:ident => $body:expr, $other:ident => $fallback:expr) => {
        match $operand {
            Operand::Scalar($c) => Operand::Scalar($body),
            Operand::Vector($c) => Operand::Vector($body),
            Operand::Tensor($c) => Operand::Tensor($body),
            Operand::SymmTensor($c) => Operand::SymmTensor($body),
            Operand::SphericalTensor($c) => Operand::SphericalTensor($body),
            $other => $fallback,
        }
    };
}

/// Combine two numeric operands of the same kind elementwise.
macro_rules! zip_same_kind {
    ($left:expr, $right:expr, $f:expr, ($l:ident, $r:ident) => $fallback:expr) => {
        match ($left, $right) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Operand::Scalar(a.zip_with(b, $f)?),
            (Operand::Vector(a), Operand::Vector(b)) => Operand::Vector(a.zip_with(b, $f)?),
            (Operand::Tensor(a), Operand::Tensor(b)) => Operand::Tensor(a.zip_with(b, $f)?),
            (Operand::SymmTensor(a), Operand::SymmTensor(b)) => {
                Operand::SymmTensor(a.zip_with(b, $f)?)
            }
            (Operand::SphericalTensor(a), Operand::SphericalTensor(b)) => {
                Operand::SphericalTensor(a.zip_with(b, $f)?)
            }
            ($l, $r) => $fallback,
        }
    };
}

pub(crate) struct Interpreter<'e, E: Environment + ?Sized> {
    env: &'e E,
    /// Number of unseeded random fields drawn so far, so that two `rand()`
    /// calls in one expression differ.
    rand_calls: u64,
}

impl<'e, E: Environment + ?Sized> Interpreter<'e, E> {
    pub fn new(env: &'e E) -> Self {
        Self { env, rand_calls: 0 }
    }

    pub fn eval(&mut self, node: Node) -> Result<Operand> {
        let Node { ty, span, op } = node;
        match op {
            Op::Constant(value) => Ok(Operand::from(value)),
            Op::Lookup {
                name,
                source,
                field_type,
            } => self.lookup(name, source, field_type, &span),
            Op::Unary(op, operand) => {
                let operand = self.eval(*operand)?;
                unary(op, operand, &span)
            }
            Op::Binary(op, left, right) => {
                let left = self.eval(*left)?;
                let right = self.eval(*right)?;
                binary(op, left, right, &span)
            }
            Op::Conditional(condition, when_true, when_false) => {
                let condition = self.eval(*condition)?;
                let when_true = self.eval(*when_true)?;
                let when_false = self.eval(*when_false)?;
                select(condition, when_true, when_false, &span)
            }
            Op::Component(operand, index) => component(self.eval(*operand)?, index, &span),
            Op::Promote(operand) => self.eval(*operand)?.promote(ty.kind, &span),
            Op::Materialize(operand, domain) => {
                let len = self.env.mesh().domain_size(domain);
                Ok(self.eval(*operand)?.spread(domain, len))
            }
            Op::Call(builtin, args) => {
                let args = args
                    .into_iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>>>()?;
                self.call(builtin, args, ty, &span)
            }
            Op::Plugin {
                name,
                arguments,
                offset,
                field_type,
            } => self
                .env
                .call_plugin(&name, &arguments, offset, field_type)
                .map(Operand::from),
        }
    }

    fn lookup(
        &self,
        name: String,
        source: LookupSource,
        field_type: FieldType,
        span: &Span,
    ) -> Result<Operand> {
        trace!(name = %name, source = ?source, "field lookup");
        let fields = self.env.fields();
        let (kind, domain) = (field_type.kind, field_type.domain);
        let found = match &source {
            LookupSource::Current => fields.lookup(&name, kind, domain),
            LookupSource::OldTime => fields.lookup_old_time(&name, kind, domain),
            LookupSource::Mapped(region) => {
                fields.lookup_mapped(&name, kind, domain, region.as_deref())
            }
        };
        let field = found.ok_or(ExprError::UnknownField { name })?;
        if field.field_type() != field_type {
            return Err(ExprError::kind_mismatch(
                field_type,
                field.field_type(),
                span.clone(),
            ));
        }
        Ok(Operand::from(field))
    }

    fn call(
        &mut self,
        builtin: Builtin,
        args: Vec<Operand>,
        ty: ExprType,
        span: &Span,
    ) -> Result<Operand> {
        match builtin {
            Builtin::Scalar(f) => {
                let [x] = take(args, span)?;
                Ok(Operand::Scalar(scalar(x, span)?.map(|x| f.apply(x))))
            }
            Builtin::Pow | Builtin::Atan2 => {
                let [a, b] = take(args, span)?;
                let (a, b) = (scalar(a, span)?, scalar(b, span)?);
                let result = if builtin == Builtin::Pow {
                    a.zip_with(b, f64::powf)?
                } else {
                    a.zip_with(b, f64::atan2)?
                };
                Ok(Operand::Scalar(result))
            }
            Builtin::ElementMin | Builtin::ElementMax => {
                let [a, b] = take(args, span)?;
                let pick: fn(f64, f64) -> f64 = if builtin == Builtin::ElementMin {
                    f64::min
                } else {
                    f64::max
                };
                Ok(zip_same_kind!(a, b, |x, y| x.zip_components(&y, pick),
                    (a, b) => return Err(operands_mismatch("min/max", a.kind(), b.kind(), span))))
            }
            Builtin::Reduce(reduction) => {
                let [arg] = take(args, span)?;
                self.reduce(reduction, arg, span)
            }
            Builtin::Tensor(f) => {
                let [arg] = take(args, span)?;
                tensor_fn(f, arg, span)
            }
            Builtin::ComposeVector => {
                let parts = scalars(args, span)?;
                Ok(Operand::Vector(Column::combine(&parts, |row| {
                    Vector::from_fn(|i| row[i])
                })?))
            }
            Builtin::ComposeTensor => {
                let parts = scalars(args, span)?;
                Ok(Operand::Tensor(Column::combine(&parts, |row| {
                    Tensor::from_fn(|i| row[i])
                })?))
            }
            Builtin::ComposeSymmTensor => {
                let parts = scalars(args, span)?;
                Ok(Operand::SymmTensor(Column::combine(&parts, |row| {
                    SymmTensor::from_fn(|i| row[i])
                })?))
            }
            Builtin::ComposeSphericalTensor => {
                let [ii] = take(args, span)?;
                Ok(Operand::SphericalTensor(scalar(ii, span)?.map(SphericalTensor::new)))
            }
            Builtin::OldTime | Builtin::Mapped => Err(ExprError::Internal {
                message: "old-time and mapped references reached the interpreter as calls".into(),
            }),
            Builtin::ToPoint | Builtin::ToFace => {
                let [arg] = take(args, span)?;
                let target = if builtin == Builtin::ToPoint {
                    Domain::Point
                } else {
                    Domain::Cell
                };
                let mesh = self.env.mesh();
                if arg.extent().is_none() {
                    return Ok(arg.spread(target, mesh.domain_size(target)));
                }
                let field = arg.into_field(target, 0);
                let moved = match target {
                    Domain::Point => mesh.interpolate_to_point(&field)?,
                    Domain::Cell => mesh.interpolate_to_cell(&field)?,
                };
                Ok(Operand::from(moved))
            }
            Builtin::Mesh(quantity) => Ok(self.mesh_quantity(quantity, ty)),
            Builtin::Rand | Builtin::RandNormal => {
                let seed = args.into_iter().next();
                self.random(builtin == Builtin::RandNormal, seed, ty, span)
            }
        }
    }

    fn reduce(&self, reduction: Reduction, arg: Operand, span: &Span) -> Result<Operand> {
        let cells = self.env.mesh().cell_count();
        let value = match arg {
            Operand::Scalar(c) => {
                let (domain, data) = c.materialize(Domain::Cell, cells);
                self.reduce_values(reduction, domain, &data)
            }
            Operand::Vector(c) => {
                let (domain, data) = c.materialize(Domain::Cell, cells);
                self.reduce_values(reduction, domain, &data)
            }
            Operand::Tensor(c) => {
                let (domain, data) = c.materialize(Domain::Cell, cells);
                self.reduce_values(reduction, domain, &data)
            }
            Operand::SymmTensor(c) => {
                let (domain, data) = c.materialize(Domain::Cell, cells);
                self.reduce_values(reduction, domain, &data)
            }
            Operand::SphericalTensor(c) => {
                let (domain, data) = c.materialize(Domain::Cell, cells);
                self.reduce_values(reduction, domain, &data)
            }
            Operand::Logical(c) if reduction == Reduction::Size => {
                let (_, data) = c.materialize(Domain::Cell, cells);
                Value::Scalar(reduce::size(data.len(), self.env.collective()))
            }
            Operand::Logical(_) => {
                return Err(ExprError::kind_mismatch(
                    "numeric argument",
                    ValueKind::Logical,
                    span.clone(),
                ))
            }
        };
        Ok(Operand::from(value))
    }

    fn reduce_values<T: Primitive>(
        &self,
        reduction: Reduction,
        domain: Domain,
        data: &[T],
    ) -> Value {
        let collective = self.env.collective();
        match reduction {
            Reduction::Min => reduce::min(data, collective).into_value(),
            Reduction::Max => reduce::max(data, collective).into_value(),
            Reduction::Sum => reduce::sum(data, collective).into_value(),
            Reduction::Average => reduce::average(data, collective).into_value(),
            Reduction::WeightedAverage => {
                let weights = self.env.mesh().weights(domain);
                reduce::weighted_average(data, &weights, collective).into_value()
            }
            Reduction::SumMag => Value::Scalar(reduce::sum_mag(data, collective)),
            Reduction::Size => Value::Scalar(reduce::size(data.len(), collective)),
            Reduction::MinPosition | Reduction::MaxPosition => {
                let values: Vec<f64> = data.iter().map(|v| v.components()[0]).collect();
                let positions = self.positions(domain);
                let largest = reduction == Reduction::MaxPosition;
                Value::Vector(reduce::extremum_position(&values, &positions, largest, collective))
            }
        }
    }

    fn positions(&self, domain: Domain) -> Vec<Vector> {
        match domain {
            Domain::Cell => self.env.mesh().cell_centres(),
            Domain::Point => self.env.mesh().point_coordinates(),
        }
    }

    fn mesh_quantity(&self, quantity: MeshQuantity, ty: ExprType) -> Operand {
        let mesh = self.env.mesh();
        let domain = ty.shape.domain().unwrap_or(Domain::Cell);
        match quantity {
            MeshQuantity::CellCentres => Operand::Vector(values(Domain::Cell, mesh.cell_centres())),
            MeshQuantity::PointCoordinates => {
                Operand::Vector(values(Domain::Point, mesh.point_coordinates()))
            }
            MeshQuantity::FaceAreaVectors => {
                Operand::Vector(values(Domain::Cell, mesh.face_areas()))
            }
            MeshQuantity::FaceAreas => {
                let areas = mesh.face_areas().iter().map(|v| v.mag()).collect();
                Operand::Scalar(values(Domain::Cell, areas))
            }
            MeshQuantity::FaceNormals => Operand::Vector(values(Domain::Cell, mesh.face_normals())),
            MeshQuantity::Index => {
                let ids = (0..mesh.domain_size(domain)).map(|i| i as f64).collect();
                Operand::Scalar(values(domain, ids))
            }
            MeshQuantity::Weights => Operand::Scalar(values(domain, mesh.weights(domain))),
            MeshQuantity::Time => Operand::Scalar(Column::Uniform(mesh.current_time())),
            MeshQuantity::DeltaT => Operand::Scalar(Column::Uniform(mesh.delta_t())),
        }
    }

    fn random(
        &mut self,
        normal: bool,
        seed: Option<Operand>,
        ty: ExprType,
        span: &Span,
    ) -> Result<Operand> {
        let seed = match seed {
            Some(operand) => {
                let value = operand.single().and_then(|v| v.as_scalar()).ok_or_else(|| {
                    ExprError::kind_mismatch(
                        ExprType::uniform(ValueKind::Scalar),
                        operand.kind(),
                        span.clone(),
                    )
                })?;
                value as u64
            }
            None => {
                self.rand_calls += 1;
                self.env.seed().wrapping_add(self.rand_calls - 1)
            }
        };

        let domain = ty.shape.domain().unwrap_or(Domain::Cell);
        let len = self.env.mesh().domain_size(domain);
        let mut rng = SmallRng::seed_from_u64(seed);
        let data = if normal {
            (0..len).map(|_| standard_normal(&mut rng)).collect()
        } else {
            (0..len).map(|_| rng.gen::<f64>()).collect()
        };
        Ok(Operand::Scalar(values(domain, data)))
    }
}

fn values<T>(domain: Domain, data: Vec<T>) -> Column<T> {
    Column::Values { domain, data }
}

/// Box-Muller transform of two uniform draws.
fn standard_normal(rng: &mut SmallRng) -> f64 {
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn take<const N: usize>(args: Vec<Operand>, span: &Span) -> Result<[Operand; N]> {
    let found = args.len();
    <[Operand; N]>::try_from(args).map_err(|_| {
        ExprError::syntax(
            format!("expected {N} argument(s), found {found}"),
            span.clone(),
            None,
        )
    })
}

fn scalar(operand: Operand, span: &Span) -> Result<Column<f64>> {
    match operand {
        Operand::Scalar(c) => Ok(c),
        other => Err(ExprError::kind_mismatch(ValueKind::Scalar, other.kind(), span.clone())),
    }
}

fn scalars(args: Vec<Operand>, span: &Span) -> Result<Vec<Column<f64>>> {
    args.into_iter().map(|arg| scalar(arg, span)).collect()
}

fn operands_mismatch(op: &str, left: ValueKind, right: ValueKind, span: &Span) -> ExprError {
    ExprError::kind_mismatch(
        format!("operands valid for '{op}'"),
        format!("{left} {op} {right}"),
        span.clone(),
    )
}

fn unary(op: UnaryOp, operand: Operand, span: &Span) -> Result<Operand> {
    Ok(match (op, operand) {
        (UnaryOp::Negate, operand) => map_numeric!(operand, c => c.map(|x| -x),
            other => {
                return Err(ExprError::kind_mismatch("numeric operand", other.kind(), span.clone()))
            }),
        (UnaryOp::Not, Operand::Logical(c)) => Operand::Logical(c.map(|b| !b)),
        (UnaryOp::Hodge, Operand::Tensor(c)) => Operand::Vector(c.map(|t| t.hodge())),
        (UnaryOp::Hodge, Operand::Vector(c)) => Operand::Tensor(c.map(|v| v.hodge())),
        (op, other) => {
            return Err(ExprError::kind_mismatch(
                format!("operand valid for '{}'", op.symbol()),
                other.kind(),
                span.clone(),
            ))
        }
    })
}

fn binary(op: BinaryOp, left: Operand, right: Operand, span: &Span) -> Result<Operand> {
    use Operand as O;

    let mismatch = |l: &O, r: &O| operands_mismatch(op.symbol(), l.kind(), r.kind(), span);
    Ok(match (op, left, right) {
        (BinaryOp::Add, l, r) => {
            zip_same_kind!(l, r, |a, b| a + b, (l, r) => return Err(mismatch(&l, &r)))
        }
        (BinaryOp::Subtract, l, r) => {
            zip_same_kind!(l, r, |a, b| a - b, (l, r) => return Err(mismatch(&l, &r)))
        }
        (BinaryOp::Multiply, O::Vector(a), O::Vector(b)) => {
            O::Tensor(a.zip_with(b, |u, v| u.outer(&v))?)
        }
        (BinaryOp::Multiply, O::Scalar(s), k) => map_numeric!(k, c => c.zip_with(s, |v, x| v * x)?,
            other => return Err(operands_mismatch("*", ValueKind::Scalar, other.kind(), span))),
        (BinaryOp::Multiply, k, O::Scalar(s)) => map_numeric!(k, c => c.zip_with(s, |v, x| v * x)?,
            other => return Err(operands_mismatch("*", other.kind(), ValueKind::Scalar, span))),
        (BinaryOp::Divide, k, O::Scalar(s)) => map_numeric!(k, c => c.zip_with(s, |v, x| v / x)?,
            other => return Err(operands_mismatch("/", other.kind(), ValueKind::Scalar, span))),
        (BinaryOp::Modulo, O::Scalar(a), O::Scalar(b)) => O::Scalar(a.zip_with(b, modulo)?),
        (BinaryOp::Dot, O::Vector(a), O::Vector(b)) => O::Scalar(a.zip_with(b, |u, v| u.dot(&v))?),
        (BinaryOp::Dot, O::Tensor(a), O::Vector(b)) => {
            O::Vector(a.zip_with(b, |t, v| t.dot_vector(&v))?)
        }
        (BinaryOp::Dot, O::Vector(a), O::Tensor(b)) => {
            O::Vector(a.zip_with(b, |v, t| v.dot_tensor(&t))?)
        }
        (BinaryOp::Dot, O::Tensor(a), O::Tensor(b)) => O::Tensor(a.zip_with(b, |s, t| s.dot(&t))?),
        (BinaryOp::Dot, O::SphericalTensor(a), O::SphericalTensor(b)) => {
            O::SphericalTensor(a.zip_with(b, |s, t| s.dot(&t))?)
        }
        (BinaryOp::Cross, O::Vector(a), O::Vector(b)) => {
            O::Vector(a.zip_with(b, |u, v| u.cross(&v))?)
        }
        (BinaryOp::AndAnd, O::Logical(a), O::Logical(b)) => {
            O::Logical(a.zip_with(b, |p, q| p && q)?)
        }
        (BinaryOp::AndAnd, O::Tensor(a), O::Tensor(b)) => {
            O::Scalar(a.zip_with(b, |s, t| s.double_dot(&t))?)
        }
        (BinaryOp::Or, O::Logical(a), O::Logical(b)) => O::Logical(a.zip_with(b, |p, q| p || q)?),
        (BinaryOp::Less, O::Scalar(a), O::Scalar(b)) => O::Logical(a.zip_with(b, |x, y| x < y)?),
        (BinaryOp::Greater, O::Scalar(a), O::Scalar(b)) => O::Logical(a.zip_with(b, |x, y| x > y)?),
        (BinaryOp::LessEqual, O::Scalar(a), O::Scalar(b)) => {
            O::Logical(a.zip_with(b, |x, y| x <= y)?)
        }
        (BinaryOp::GreaterEqual, O::Scalar(a), O::Scalar(b)) => {
            O::Logical(a.zip_with(b, |x, y| x >= y)?)
        }
        (BinaryOp::Equal, O::Scalar(a), O::Scalar(b)) => O::Logical(a.zip_with(b, |x, y| x == y)?),
        (BinaryOp::Equal, O::Logical(a), O::Logical(b)) => {
            O::Logical(a.zip_with(b, |p, q| p == q)?)
        }
        (BinaryOp::NotEqual, O::Scalar(a), O::Scalar(b)) => {
            O::Logical(a.zip_with(b, |x, y| x != y)?)
        }
        (BinaryOp::NotEqual, O::Logical(a), O::Logical(b)) => {
            O::Logical(a.zip_with(b, |p, q| p != q)?)
        }
        (_, l, r) => return Err(mismatch(&l, &r)),
    })
}

fn select(
    condition: Operand,
    when_true: Operand,
    when_false: Operand,
    span: &Span,
) -> Result<Operand> {
    use Operand as O;

    let condition = match condition {
        O::Logical(c) => c,
        other => {
            return Err(ExprError::kind_mismatch(
                ValueKind::Logical,
                other.kind(),
                span.clone(),
            ))
        }
    };
    Ok(match (when_true, when_false) {
        (O::Scalar(a), O::Scalar(b)) => O::Scalar(condition.select(a, b)?),
        (O::Vector(a), O::Vector(b)) => O::Vector(condition.select(a, b)?),
        (O::Tensor(a), O::Tensor(b)) => O::Tensor(condition.select(a, b)?),
        (O::SymmTensor(a), O::SymmTensor(b)) => O::SymmTensor(condition.select(a, b)?),
        (O::SphericalTensor(a), O::SphericalTensor(b)) => {
            O::SphericalTensor(condition.select(a, b)?)
        }
        (O::Logical(a), O::Logical(b)) => O::Logical(condition.select(a, b)?),
        (a, b) => return Err(ExprError::kind_mismatch(a.kind(), b.kind(), span.clone())),
    })
}

fn component(operand: Operand, index: usize, span: &Span) -> Result<Operand> {
    let column = match operand {
        Operand::Vector(c) => c.map(|v| v.components()[index]),
        Operand::Tensor(c) => c.map(|t| t.components()[index]),
        Operand::SymmTensor(c) => c.map(|s| s.components()[index]),
        Operand::SphericalTensor(c) => c.map(|s| s.components()[index]),
        other => {
            return Err(ExprError::kind_mismatch(
                "a kind with components",
                other.kind(),
                span.clone(),
            ))
        }
    };
    Ok(Operand::Scalar(column))
}

fn tensor_fn(f: TensorFn, operand: Operand, span: &Span) -> Result<Operand> {
    use Operand as O;
    use TensorFn as F;

    let unsupported = |kind: ValueKind| {
        ExprError::kind_mismatch(format!("argument valid for {f:?}"), kind, span.clone())
    };
    Ok(match (f, operand) {
        (F::Mag, operand) => match operand {
            O::Scalar(c) => O::Scalar(c.map(|v| v.mag())),
            O::Vector(c) => O::Scalar(c.map(|v| v.mag())),
            O::Tensor(c) => O::Scalar(c.map(|v| v.mag())),
            O::SymmTensor(c) => O::Scalar(c.map(|v| v.mag())),
            O::SphericalTensor(c) => O::Scalar(c.map(|v| v.mag())),
            O::Logical(_) => return Err(unsupported(ValueKind::Logical)),
        },
        (F::MagSqr, operand) => match operand {
            O::Scalar(c) => O::Scalar(c.map(|v| v.mag_sqr())),
            O::Vector(c) => O::Scalar(c.map(|v| v.mag_sqr())),
            O::Tensor(c) => O::Scalar(c.map(|v| v.mag_sqr())),
            O::SymmTensor(c) => O::Scalar(c.map(|v| v.mag_sqr())),
            O::SphericalTensor(c) => O::Scalar(c.map(|v| v.mag_sqr())),
            O::Logical(_) => return Err(unsupported(ValueKind::Logical)),
        },
        (F::Transpose, O::Tensor(c)) => O::Tensor(c.map(|t| t.transpose())),
        (F::Transpose, symmetric @ (O::SymmTensor(_) | O::SphericalTensor(_))) => symmetric,
        (F::Tr, O::Tensor(c)) => O::Scalar(c.map(|t| t.trace())),
        (F::Tr, O::SymmTensor(c)) => O::Scalar(c.map(|t| t.trace())),
        (F::Tr, O::SphericalTensor(c)) => O::Scalar(c.map(|t| t.trace())),
        (F::Det, O::Tensor(c)) => O::Scalar(c.map(|t| t.det())),
        (F::Det, O::SymmTensor(c)) => O::Scalar(c.map(|t| t.det())),
        (F::Det, O::SphericalTensor(c)) => O::Scalar(c.map(|t| t.det())),
        (F::Inv, O::Tensor(c)) => O::Tensor(c.map(|t| t.inv())),
        (F::Inv, O::SymmTensor(c)) => O::SymmTensor(c.map(|t| t.inv())),
        (F::Inv, O::SphericalTensor(c)) => O::SphericalTensor(c.map(|t| t.inv())),
        (F::Cof, O::Tensor(c)) => O::Tensor(c.map(|t| t.cof())),
        (F::Cof, O::SymmTensor(c)) => O::SymmTensor(c.map(|t| t.cof())),
        (F::Cof, O::SphericalTensor(c)) => O::SphericalTensor(c.map(|t| t.cof())),
        (F::Dev, O::Tensor(c)) => O::Tensor(c.map(|t| t.dev())),
        (F::Dev, O::SymmTensor(c)) => O::SymmTensor(c.map(|t| t.dev())),
        (F::Dev2, O::Tensor(c)) => O::Tensor(c.map(|t| t.dev2())),
        (F::Dev2, O::SymmTensor(c)) => O::SymmTensor(c.map(|t| t.dev2())),
        (F::Symm, O::Tensor(c)) => O::SymmTensor(c.map(|t| t.symm())),
        (F::TwoSymm, O::Tensor(c)) => O::SymmTensor(c.map(|t| t.two_symm())),
        (F::Skew, O::Tensor(c)) => O::Tensor(c.map(|t| t.skew())),
        (F::Sph, O::Tensor(c)) => O::SphericalTensor(c.map(|t| t.sph())),
        (F::Sph, O::SymmTensor(c)) => O::SphericalTensor(c.map(|t| t.sph())),
        (F::Sph, spherical @ O::SphericalTensor(_)) => spherical,
        (F::Diag, O::Tensor(c)) => O::Vector(c.map(|t| t.diag())),
        (F::Diag, O::SymmTensor(c)) => O::Vector(c.map(|t| t.diag())),
        (F::Diag, O::SphericalTensor(c)) => O::Vector(c.map(|t| t.diag())),
        (F::EigenValues, O::Tensor(c)) => O::Vector(c.map(|t| t.eigen_values())),
        (F::EigenVectors, O::Tensor(c)) => O::Tensor(c.map(|t| t.eigen_vectors())),
        (_, other) => return Err(unsupported(other.kind())),
    })
}
