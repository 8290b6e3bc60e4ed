//! # fieldcalc
//!
//! A typed expression evaluator for field data on simulation meshes.
//!
//! Expressions such as `mag(U) + p/rho` or `p > 5 ? p : 0` are tokenized,
//! parsed against a start symbol, type checked over six value kinds in two
//! domains and evaluated elementwise against host-supplied mesh and field data.
//! Host code plugs in through the [`Mesh`], [`FieldSource`] and [`Collective`]
//! traits; extension functions register through a [`PluginRegistry`].

pub mod fieldcalc;

pub use fieldcalc::error::{ExprError, Result, Span};
pub use fieldcalc::evaluator::{Evaluator, ExpressionResult};
pub use fieldcalc::host::{Collective, FieldSource, Mesh, Serial};
pub use fieldcalc::memory::MemoryCase;
pub use fieldcalc::parser::{StartSymbol, Terminator};
pub use fieldcalc::plugin::{
    ArgumentSpec, ModelCache, PluginArgument, PluginContext, PluginFunction, PluginRegistry,
};
pub use fieldcalc::value::{
    Domain, Field, FieldType, FieldValues, SphericalTensor, SymmTensor, Tensor, Value, ValueKind,
    Vector,
};
pub use fieldcalc_config::FieldcalcConfig;
