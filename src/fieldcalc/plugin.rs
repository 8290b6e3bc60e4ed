//! Plugin functions
//!
//! Host code extends the language with named functions that return a field of
//! a declared type. A plugin is registered once in a [`PluginRegistry`] and
//! instantiated per call through its factory. The lexer hands a plugin call
//! its raw argument text; the function scans that text itself, by default
//! following the [`ArgumentSpec`] list given at registration.

pub mod arguments;
pub mod cache;
pub mod function;
pub mod registry;

pub use arguments::{ArgumentSpec, PluginArgument};
pub use cache::ModelCache;
pub use function::{PluginContext, PluginFunction};
pub use registry::{PluginRegistry, Registration};
