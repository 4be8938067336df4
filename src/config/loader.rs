//! Configuration Loader
//!
//! Layers built-in defaults, an optional file (format picked from its
//! extension) and prefixed environment variables, then validates the result.

use super::error::{ConfigResult, ConfigurationError};
use super::RegistryConfig;
use ::config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment prefix used unless overridden: `DISPATCH_SUGGEST_METHODS`, ...
pub const DEFAULT_ENV_PREFIX: &str = "DISPATCH";

/// Builds a [`RegistryConfig`] from layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            file: None,
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `path`. The file must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Skip the environment layer entirely.
    #[must_use]
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn load(&self) -> ConfigResult<RegistryConfig> {
        let defaults = RegistryConfig::default();
        let mut builder = Config::builder()
            .set_default("suggest_methods", defaults.suggest_methods)
            .and_then(|b| b.set_default("namespace_separator", defaults.namespace_separator))
            .and_then(|b| b.set_default("lenient_coercion", defaults.lenient_coercion))
            .map_err(|e| ConfigurationError::load_error("defaults", e))?;

        if let Some(path) = &self.file {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(Environment::with_prefix(prefix).try_parsing(true));
        }

        let source_name = self
            .file
            .as_ref()
            .map_or_else(|| "environment".to_string(), |p| p.display().to_string());

        let config: RegistryConfig = builder
            .build()
            .map_err(|e| ConfigurationError::load_error(source_name, e))?
            .try_deserialize()
            .map_err(ConfigurationError::deserialize_error)?;

        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = ConfigLoader::new().without_env().load().unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = ConfigLoader::new()
            .without_env()
            .with_file("/nonexistent/dispatch.toml")
            .load();
        assert!(matches!(result, Err(ConfigurationError::LoadError { .. })));
    }

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("DISPATCHLOADERTEST_SUGGEST_METHODS", "false");
        std::env::set_var("DISPATCHLOADERTEST_NAMESPACE_SEPARATOR", "/");
        let config = ConfigLoader::new()
            .with_env_prefix("DISPATCHLOADERTEST")
            .load()
            .unwrap();
        std::env::remove_var("DISPATCHLOADERTEST_SUGGEST_METHODS");
        std::env::remove_var("DISPATCHLOADERTEST_NAMESPACE_SEPARATOR");

        assert!(!config.suggest_methods);
        assert_eq!(config.namespace_separator, "/");
        assert!(config.lenient_coercion);
    }
}
