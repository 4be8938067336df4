//! # Registry Configuration
//!
//! Settings that shape registration and invocation. Loaded in layers by
//! [`ConfigLoader`]: built-in defaults, then an optional file, then
//! `DISPATCH_`-prefixed environment variables.
//!
//! ```rust
//! use dispatch_core::config::RegistryConfig;
//!
//! let config = RegistryConfig::default();
//! assert!(config.suggest_methods);
//! assert_eq!(config.namespace_separator, ".");
//! ```

pub mod error;
pub mod loader;

use crate::codec::CoercionMode;
use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Attach "did you mean" suggestions to `MethodNotFound`.
    pub suggest_methods: bool,
    /// Joins a descriptor's namespace and name into its registry key.
    pub namespace_separator: String,
    /// Retry failed scalar decodes in the alternate scalar form.
    pub lenient_coercion: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            suggest_methods: true,
            namespace_separator: ".".to_string(),
            lenient_coercion: true,
        }
    }
}

impl RegistryConfig {
    pub fn coercion_mode(&self) -> CoercionMode {
        if self.lenient_coercion {
            CoercionMode::Lenient
        } else {
            CoercionMode::Strict
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.namespace_separator.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "namespace_separator",
                "",
                "separator must not be empty",
            ));
        }
        Ok(())
    }
}
