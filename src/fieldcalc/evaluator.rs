//! Evaluator facade
//!
//! An [`Evaluator`] binds the host collaborators, the plugin registry and the
//! configuration, and runs the whole pipeline for one expression: tokenize,
//! parse against a start symbol, check kinds, evaluate.

use std::sync::Arc;
use tracing::{debug, trace};

use crate::fieldcalc::error::{ExprError, Result};
use crate::fieldcalc::host::{Collective, FieldSource, Mesh, Serial};
use crate::fieldcalc::lexer::tokenize;
use crate::fieldcalc::parser::{parse, Expr, StartSymbol, Terminator};
use crate::fieldcalc::plugin::{PluginContext, PluginRegistry};
use crate::fieldcalc::semantics::check::Checker;
use crate::fieldcalc::semantics::eval::{Environment, Interpreter};
use crate::fieldcalc::semantics::operand::Operand;
use crate::fieldcalc::semantics::Shape;
use crate::fieldcalc::value::{Domain, Field, FieldType, Value, ValueKind};
use fieldcalc_config::FieldcalcConfig;

static SERIAL: Serial = Serial;

/// The final value of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionResult {
    Field(Field),
    /// Constant or reduced expressions under [`StartSymbol::Default`].
    Single(Value),
}

impl ExpressionResult {
    pub fn kind(&self) -> ValueKind {
        match self {
            ExpressionResult::Field(field) => field.kind(),
            ExpressionResult::Single(value) => value.kind(),
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            ExpressionResult::Field(field) => Some(field),
            ExpressionResult::Single(_) => None,
        }
    }

    pub fn into_field(self) -> Option<Field> {
        match self {
            ExpressionResult::Field(field) => Some(field),
            ExpressionResult::Single(_) => None,
        }
    }

    pub fn as_single(&self) -> Option<Value> {
        match self {
            ExpressionResult::Single(value) => Some(*value),
            ExpressionResult::Field(_) => None,
        }
    }

    /// True when any component of the result is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        match self {
            ExpressionResult::Field(field) => field.has_non_finite(),
            ExpressionResult::Single(value) => value.components().iter().any(|c| !c.is_finite()),
        }
    }
}

pub struct Evaluator<'a> {
    mesh: &'a dyn Mesh,
    fields: &'a dyn FieldSource,
    collective: &'a dyn Collective,
    plugins: Arc<PluginRegistry>,
    config: FieldcalcConfig,
    /// Plugin calls between this evaluator and the top-level expression.
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// An evaluator over one mesh and its fields, with no plugins, a single
    /// partition and the default configuration.
    pub fn new(mesh: &'a dyn Mesh, fields: &'a dyn FieldSource) -> Self {
        Self {
            mesh,
            fields,
            collective: &SERIAL,
            plugins: Arc::new(PluginRegistry::new()),
            config: FieldcalcConfig::default(),
            depth: 0,
        }
    }

    pub fn with_plugins(mut self, plugins: Arc<PluginRegistry>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_collective(mut self, collective: &'a dyn Collective) -> Self {
        self.collective = collective;
        self
    }

    pub fn with_config(mut self, config: FieldcalcConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mesh(&self) -> &dyn Mesh {
        self.mesh
    }

    pub fn fields(&self) -> &dyn FieldSource {
        self.fields
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn config(&self) -> &FieldcalcConfig {
        &self.config
    }

    /// Parse and evaluate `source` as a whole.
    ///
    /// Under [`StartSymbol::Typed`] the result is always a field of that type;
    /// uniform values are spread over the domain. Under
    /// [`StartSymbol::Default`] a uniform result comes back as
    /// [`ExpressionResult::Single`]. The argument start symbols evaluate the
    /// leading argument and ignore the rest of the text.
    pub fn evaluate(&self, source: &str, start: StartSymbol) -> Result<ExpressionResult> {
        debug!(source, ?start, depth = self.depth, "evaluating expression");
        let expr = self.parse(source, &start)?.0.ok_or_else(|| {
            ExprError::syntax("no expression before the terminator", 0..source.len(), None)
        })?;

        let expected = start.expected();
        let operand = self.run(&expr, expected)?;
        let result = match expected {
            Some(ft) => ExpressionResult::Field(self.into_field(operand, ft.domain)),
            None => match operand.single() {
                Some(value) => ExpressionResult::Single(value),
                None => ExpressionResult::Field(self.into_field(operand, Domain::Cell)),
            },
        };

        if self.config.evaluation.strict_numerics && result.has_non_finite() {
            return Err(ExprError::UndefinedNumericResult {
                what: format!("'{source}' produced a NaN or infinite value"),
            });
        }
        debug!(kind = %result.kind(), "expression evaluated");
        Ok(result)
    }

    /// Evaluate the field argument at the start of `text`, up to and
    /// including `terminator`. Answers the field and the byte offset just
    /// past the terminator.
    pub fn evaluate_argument(
        &self,
        text: &str,
        field_type: FieldType,
        terminator: Terminator,
    ) -> Result<(Field, usize)> {
        let start = StartSymbol::Argument(field_type, terminator);
        let (expr, end) = self.parse(text, &start)?;
        let expr = expr.ok_or_else(|| ExprError::syntax("expected an argument", 0..end, None))?;
        let operand = self.run(&expr, Some(field_type))?;
        Ok((self.into_field(operand, field_type.domain), end))
    }

    /// Evaluate a single-number argument at the start of `text`.
    pub fn evaluate_scalar_argument(
        &self,
        text: &str,
        terminator: Terminator,
    ) -> Result<(f64, usize)> {
        let start = StartSymbol::Argument(FieldType::cell(ValueKind::Scalar), terminator);
        let (expr, end) = self.parse(text, &start)?;
        let expr = expr.ok_or_else(|| ExprError::syntax("expected an argument", 0..end, None))?;
        let node = Checker::new(self.fields, &self.plugins, Domain::Cell).check_root(&expr, None)?;
        if node.ty.kind != ValueKind::Scalar || node.ty.shape != Shape::Uniform {
            return Err(ExprError::kind_mismatch("single scalar", node.ty, node.span));
        }
        let value = Interpreter::new(self)
            .eval(node)?
            .single()
            .and_then(|v| v.as_scalar())
            .ok_or_else(|| ExprError::kind_mismatch("single scalar", "field", expr.span.clone()))?;
        Ok((value, end))
    }

    /// Consume a bare terminator at the start of `text`.
    pub fn expect_terminator(&self, text: &str, terminator: Terminator) -> Result<usize> {
        let (_, end) = self.parse(text, &StartSymbol::TerminatorOnly(terminator))?;
        Ok(end)
    }

    fn parse(&self, source: &str, start: &StartSymbol) -> Result<(Option<Expr>, usize)> {
        let tokens = tokenize(source, |name| self.plugins.contains(name))?;
        if self.config.diagnostics.trace_tokens {
            for (token, span) in &tokens {
                trace!(%token, ?span, "token");
            }
        }
        let parsed = parse(tokens, source.len(), start)?;
        Ok((parsed.expr, parsed.end))
    }

    fn run(&self, expr: &Expr, expected: Option<FieldType>) -> Result<Operand> {
        let preferred = expected.map_or(Domain::Cell, |ft| ft.domain);
        let node = Checker::new(self.fields, &self.plugins, preferred).check_root(expr, expected)?;
        Interpreter::new(self).eval(node)
    }

    fn into_field(&self, operand: Operand, domain: Domain) -> Field {
        operand.into_field(domain, self.mesh.domain_size(domain))
    }

    /// An evaluator for the arguments of a plugin called from this one.
    fn nested(&self) -> Evaluator<'a> {
        Evaluator {
            mesh: self.mesh,
            fields: self.fields,
            collective: self.collective,
            plugins: Arc::clone(&self.plugins),
            config: self.config.clone(),
            depth: self.depth + 1,
        }
    }
}

impl Environment for Evaluator<'_> {
    fn mesh(&self) -> &dyn Mesh {
        self.mesh
    }

    fn fields(&self) -> &dyn FieldSource {
        self.fields
    }

    fn collective(&self) -> &dyn Collective {
        self.collective
    }

    fn seed(&self) -> u64 {
        self.config.random.seed
    }

    fn call_plugin(
        &self,
        name: &str,
        arguments: &str,
        offset: usize,
        field_type: FieldType,
    ) -> Result<Field> {
        let limit = self.config.plugins.max_nesting;
        if self.depth >= limit {
            return Err(ExprError::Plugin {
                name: name.into(),
                message: format!("plugin calls nested deeper than {limit}"),
            });
        }
        let registration =
            self.plugins
                .find(name, field_type)
                .ok_or_else(|| ExprError::PluginTypeMismatch {
                    name: name.into(),
                    expected: field_type,
                    declared: self.plugins.describe(name),
                })?;
        debug!(plugin = name, %field_type, arguments, "calling plugin function");

        let nested = self.nested();
        let context = PluginContext::new(&nested, name, &registration);
        let mut function = registration.instantiate(&context)?;
        let parsed = function
            .parse_arguments(&context, arguments)
            .map_err(|err| err.shifted(offset))?;
        let field = function.evaluate(&context, parsed)?;

        if field.field_type() != field_type {
            return Err(ExprError::PluginTypeMismatch {
                name: name.into(),
                expected: field_type,
                declared: field.field_type().to_string(),
            });
        }
        let expected_len = self.mesh.domain_size(field_type.domain);
        if field.len() != expected_len {
            return Err(ExprError::SizeMismatch {
                left: expected_len,
                right: field.len(),
            });
        }
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldcalc::memory::MemoryCase;
    use crate::fieldcalc::plugin::{ArgumentSpec, PluginArgument};
    use crate::fieldcalc::value::Vector;

    fn case() -> MemoryCase {
        MemoryCase::new()
            .with_cells(vec![
                Vector::new(0.0, 0.0, 0.0),
                Vector::new(1.0, 0.0, 0.0),
                Vector::new(2.0, 0.0, 0.0),
            ])
            .with_field("p", Field::scalar(Domain::Cell, vec![1.0, 7.0, 3.0]))
    }

    #[test]
    fn test_default_start_answers_single_values() {
        let case = case();
        let evaluator = Evaluator::new(&case, &case);
        let result = evaluator
            .evaluate("max(p) + 1", StartSymbol::Default)
            .expect("evaluation");
        assert_eq!(result, ExpressionResult::Single(Value::Scalar(8.0)));
    }

    #[test]
    fn test_typed_start_spreads_constants() {
        let case = case();
        let evaluator = Evaluator::new(&case, &case);
        let result = evaluator
            .evaluate("2", StartSymbol::Typed(FieldType::cell(ValueKind::Scalar)))
            .expect("evaluation");
        assert_eq!(
            result.into_field(),
            Some(Field::scalar(Domain::Cell, vec![2.0, 2.0, 2.0]))
        );
    }

    #[test]
    fn test_argument_scanning() {
        let case = case();
        let evaluator = Evaluator::new(&case, &case);
        let (field, end) = evaluator
            .evaluate_argument("p*2, 3)", FieldType::cell(ValueKind::Scalar), Terminator::Comma)
            .expect("field argument");
        assert_eq!(field, Field::scalar(Domain::Cell, vec![2.0, 14.0, 6.0]));
        assert_eq!(end, 4);

        let (value, end) = evaluator
            .evaluate_scalar_argument(" 2*3)", Terminator::Close)
            .expect("scalar argument");
        assert_eq!((value, end), (6.0, 5));

        assert!(evaluator.evaluate_scalar_argument("p)", Terminator::Close).is_err());
        assert_eq!(evaluator.expect_terminator(" )", Terminator::Close), Ok(2));
    }

    #[test]
    fn test_nesting_limit() {
        let case = case();
        let plugins = Arc::new(PluginRegistry::new());
        let ft = FieldType::cell(ValueKind::Scalar);
        plugins
            .register_fn(
                "same",
                ft,
                vec![ArgumentSpec::Field(ft)],
                |_, mut args: Vec<PluginArgument>| {
                    args.pop()
                        .and_then(PluginArgument::into_field)
                        .ok_or_else(|| ExprError::Host {
                            message: "missing argument".into(),
                        })
                },
            )
            .expect("registration");

        let mut config = FieldcalcConfig::default();
        config.plugins.max_nesting = 2;
        let evaluator = Evaluator::new(&case, &case)
            .with_plugins(plugins)
            .with_config(config);
        let typed = StartSymbol::Typed(ft);
        assert!(evaluator.evaluate("same(same(p))", typed).is_ok());
        assert!(matches!(
            evaluator.evaluate("same(same(same(p)))", typed),
            Err(ExprError::Plugin { .. })
        ));
    }
}
