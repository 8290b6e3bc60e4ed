//! Configuration loader for the fieldcalc evaluator.
//!
//! `defaults/fieldcalc.default.toml` is embedded into the crate so documented
//! defaults and runtime behavior cannot drift. Embedders layer their own files
//! on top via [`Loader`] before deserializing into [`FieldcalcConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/fieldcalc.default.toml");

/// Top-level configuration consumed by the evaluator.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldcalcConfig {
    pub evaluation: EvaluationConfig,
    pub random: RandomConfig,
    pub plugins: PluginsConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Numeric policy of the evaluation pass.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Turn NaN/Inf in the final result into an error instead of data.
    pub strict_numerics: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RandomConfig {
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginsConfig {
    /// How deep plugin calls may nest through field-typed arguments.
    pub max_nesting: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub trace_tokens: bool,
}

impl Default for FieldcalcConfig {
    fn default() -> Self {
        Self {
            evaluation: EvaluationConfig {
                strict_numerics: false,
            },
            random: RandomConfig { seed: 42 },
            plugins: PluginsConfig { max_nesting: 16 },
            diagnostics: DiagnosticsConfig {
                trace_tokens: false,
            },
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `("random.seed", 7)`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<FieldcalcConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FieldcalcConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(!config.evaluation.strict_numerics);
        assert_eq!(config.random.seed, 42);
        assert_eq!(config.plugins.max_nesting, 16);
        assert!(!config.diagnostics.trace_tokens);
    }

    #[test]
    fn embedded_defaults_match_default_impl() {
        let loaded = load_defaults().expect("defaults to deserialize");
        let built = FieldcalcConfig::default();
        assert_eq!(loaded.random.seed, built.random.seed);
        assert_eq!(loaded.plugins.max_nesting, built.plugins.max_nesting);
        assert_eq!(
            loaded.evaluation.strict_numerics,
            built.evaluation.strict_numerics
        );
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("evaluation.strict_numerics", true)
            .expect("override to apply")
            .set_override("random.seed", 7_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.evaluation.strict_numerics);
        assert_eq!(config.random.seed, 7);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("definitely/not/here.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.plugins.max_nesting, 16);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("definitely/not/here.toml").build();
        assert!(result.is_err());
    }
}
