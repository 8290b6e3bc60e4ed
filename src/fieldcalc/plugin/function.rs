//! The plugin function interface and its call context

use super::arguments::{scan_arguments, ArgumentSpec, PluginArgument};
use super::cache::ModelCache;
use super::registry::Registration;
use crate::fieldcalc::error::Result;
use crate::fieldcalc::evaluator::{Evaluator, ExpressionResult};
use crate::fieldcalc::host::{FieldSource, Mesh};
use crate::fieldcalc::parser::{StartSymbol, Terminator};
use crate::fieldcalc::value::{Field, FieldType};

/// One instance per call, built by the registration's factory.
pub trait PluginFunction {
    /// Scan the raw argument text, `text` running from just after `(`
    /// through the matching `)`. The default follows the declared
    /// [`ArgumentSpec`] list.
    fn parse_arguments(
        &mut self,
        context: &PluginContext<'_>,
        text: &str,
    ) -> Result<Vec<PluginArgument>> {
        scan_arguments(context, context.argument_spec(), text)
    }

    /// Produce a field of exactly the declared return type, sized for the
    /// declared domain.
    fn evaluate(&mut self, context: &PluginContext<'_>, arguments: Vec<PluginArgument>)
        -> Result<Field>;
}

/// What a plugin function can see while it runs.
///
/// Argument expressions evaluated through the context run one plugin level
/// deeper than the call itself and are bounded by `plugins.max_nesting`.
pub struct PluginContext<'c> {
    evaluator: &'c Evaluator<'c>,
    name: &'c str,
    registration: &'c Registration,
}

impl<'c> PluginContext<'c> {
    pub(crate) fn new(
        evaluator: &'c Evaluator<'c>,
        name: &'c str,
        registration: &'c Registration,
    ) -> Self {
        Self {
            evaluator,
            name,
            registration,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn return_type(&self) -> FieldType {
        self.registration.return_type()
    }

    pub fn argument_spec(&self) -> &[ArgumentSpec] {
        self.registration.arguments()
    }

    pub fn mesh(&self) -> &dyn Mesh {
        self.evaluator.mesh()
    }

    pub fn fields(&self) -> &dyn FieldSource {
        self.evaluator.fields()
    }

    pub fn region_name(&self) -> &str {
        self.evaluator.mesh().region_name()
    }

    /// Models shared by every evaluator using the same registry.
    pub fn cache(&self) -> &ModelCache {
        self.evaluator.plugins().cache()
    }

    /// Number of elements of the declared return domain.
    pub fn size(&self) -> usize {
        self.mesh().domain_size(self.return_type().domain)
    }

    /// Evaluate a complete expression.
    pub fn evaluate(&self, source: &str, start: StartSymbol) -> Result<ExpressionResult> {
        self.evaluator.evaluate(source, start)
    }

    /// Evaluate one field argument at the start of `text`; answers the field
    /// and the offset just past `terminator`.
    pub fn evaluate_argument(
        &self,
        text: &str,
        field_type: FieldType,
        terminator: Terminator,
    ) -> Result<(Field, usize)> {
        self.evaluator.evaluate_argument(text, field_type, terminator)
    }

    /// Evaluate one single-number argument at the start of `text`.
    pub fn evaluate_scalar_argument(
        &self,
        text: &str,
        terminator: Terminator,
    ) -> Result<(f64, usize)> {
        self.evaluator.evaluate_scalar_argument(text, terminator)
    }

    /// Consume a bare terminator at the start of `text`.
    pub fn expect_terminator(&self, text: &str, terminator: Terminator) -> Result<usize> {
        self.evaluator.expect_terminator(text, terminator)
    }
}
