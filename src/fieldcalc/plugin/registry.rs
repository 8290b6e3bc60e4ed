//! Registry of plugin functions
//!
//! A plugin is keyed by its name and its return [`FieldType`]; one name may be
//! registered for several return types and the checker picks the one that
//! fits the calling context. The registry is an explicit object: evaluators
//! share it through an `Arc`, and registration may happen while other threads
//! read it.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::arguments::{ArgumentSpec, PluginArgument};
use super::cache::ModelCache;
use super::function::{PluginContext, PluginFunction};
use crate::fieldcalc::error::{ExprError, Result};
use crate::fieldcalc::semantics::builtins::is_builtin;
use crate::fieldcalc::value::{Field, FieldType};

static PLUGIN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid plugin name pattern"));

/// Builds one function instance per call.
type Factory = Arc<dyn Fn(&PluginContext<'_>) -> Result<Box<dyn PluginFunction>> + Send + Sync>;

/// Closure body of a plugin registered with [`PluginRegistry::register_fn`].
type Body = Arc<dyn Fn(&PluginContext<'_>, Vec<PluginArgument>) -> Result<Field> + Send + Sync>;

#[derive(Clone)]
pub struct Registration {
    return_type: FieldType,
    arguments: Vec<ArgumentSpec>,
    factory: Factory,
}

impl Registration {
    pub fn return_type(&self) -> FieldType {
        self.return_type
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub(crate) fn instantiate(
        &self,
        context: &PluginContext<'_>,
    ) -> Result<Box<dyn PluginFunction>> {
        (self.factory)(context)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("return_type", &self.return_type)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct PluginRegistry {
    entries: RwLock<HashMap<String, Vec<Registration>>>,
    cache: ModelCache,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` returning `return_type`. Registering the same name and
    /// return type again replaces the earlier factory.
    pub fn register<F>(
        &self,
        name: &str,
        return_type: FieldType,
        arguments: Vec<ArgumentSpec>,
        factory: F,
    ) -> Result<()>
    where
        F: Fn(&PluginContext<'_>) -> Result<Box<dyn PluginFunction>> + Send + Sync + 'static,
    {
        validate_name(name)?;
        let registration = Registration {
            return_type,
            arguments,
            factory: Arc::new(factory),
        };

        let mut entries = self.entries.write();
        let registrations = entries.entry(name.to_string()).or_default();
        match registrations
            .iter_mut()
            .find(|r| r.return_type == return_type)
        {
            Some(existing) => {
                warn!(plugin = name, %return_type, "replacing plugin function registration");
                *existing = registration;
            }
            None => {
                debug!(plugin = name, %return_type, "registered plugin function");
                registrations.push(registration);
            }
        }
        Ok(())
    }

    /// Register a stateless plugin given as a closure over its scanned
    /// arguments.
    pub fn register_fn<F>(
        &self,
        name: &str,
        return_type: FieldType,
        arguments: Vec<ArgumentSpec>,
        body: F,
    ) -> Result<()>
    where
        F: Fn(&PluginContext<'_>, Vec<PluginArgument>) -> Result<Field> + Send + Sync + 'static,
    {
        let body: Body = Arc::new(body);
        self.register(name, return_type, arguments, move |_| {
            Ok(Box::new(ClosurePlugin {
                body: Arc::clone(&body),
            }) as Box<dyn PluginFunction>)
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Every return type `name` is registered for, in registration order.
    pub fn declared_types(&self, name: &str) -> Vec<FieldType> {
        self.entries
            .read()
            .get(name)
            .map(|rs| rs.iter().map(|r| r.return_type).collect())
            .unwrap_or_default()
    }

    /// Human-readable list of the declared return types, for errors.
    pub fn describe(&self, name: &str) -> String {
        let declared: Vec<String> = self
            .declared_types(name)
            .iter()
            .map(FieldType::to_string)
            .collect();
        if declared.is_empty() {
            "nothing".to_string()
        } else {
            declared.join(" or ")
        }
    }

    pub fn find(&self, name: &str, return_type: FieldType) -> Option<Registration> {
        self.entries
            .read()
            .get(name)?
            .iter()
            .find(|r| r.return_type == return_type)
            .cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("names", &self.names())
            .field("cache", &self.cache)
            .finish()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let reason = if !PLUGIN_NAME.is_match(name) {
        "not a valid identifier"
    } else if is_builtin(name) || name == "true" || name == "false" {
        "name is taken by a built-in"
    } else {
        return Ok(());
    };
    Err(ExprError::Plugin {
        name: name.into(),
        message: format!("cannot register: {reason}"),
    })
}

struct ClosurePlugin {
    body: Body,
}

impl PluginFunction for ClosurePlugin {
    fn evaluate(
        &mut self,
        context: &PluginContext<'_>,
        arguments: Vec<PluginArgument>,
    ) -> Result<Field> {
        (self.body)(context, arguments)
    }
}
