#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Dispatch Core
//!
//! Exposes registered methods as remotely callable operations identified by
//! name.
//!
//! ## Overview
//!
//! Arguments arrive as a loosely-typed document, either a positional array
//! or a named object, and results leave as a document. In between, the
//! invocation engine resolves the method name, binds the document onto the
//! method's typed parameter list (defaults, nullability, coercion, strict
//! rejection of unknown names), calls the method and encodes its result.
//! Unresolved names get ranked "did you mean" suggestions.
//!
//! ## Module Organization
//!
//! - [`registry`] - Descriptors, binder, invocation engine, suggestions, registry
//! - [`codec`] - Value-node ↔ typed value conversion
//! - [`document`] - Argument document shapes
//! - [`config`] - Layered registry configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup and helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use dispatch_core::{InvocationError, MethodDescriptor, MethodRegistry};
//! use serde_json::json;
//!
//! let mut registry = MethodRegistry::new();
//! registry.register(
//!     MethodDescriptor::builder("add")
//!         .namespace("calculator")
//!         .param::<i64>("a")
//!         .param::<i64>("b")
//!         .handler(|mut args| Ok(args.take::<i64>(0)? + args.take::<i64>(1)?))
//!         .build()
//!         .unwrap(),
//! );
//!
//! assert_eq!(registry.invoke("calculator.add", &json!([2, 3])).unwrap(), json!(5));
//!
//! let err = registry.invoke("calculator.ad", &json!([])).unwrap_err();
//! assert!(matches!(err, InvocationError::MethodNotFound { .. }));
//! assert_eq!(err.suggestions(), Some(&["calculator.add".to_string()][..]));
//! ```

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod registry;

pub use codec::{BoundValue, Codec, CodecError, CoercionMode, JsonCodec, TypeRef};
pub use config::{ConfigLoader, ConfigurationError, RegistryConfig};
pub use document::{ArgumentDocument, NodeKind};
pub use error::{BindingError, InvocationError, InvocationResult};
pub use registry::{
    Access, BoundArgs, DescriptorError, MethodDescriptor, MethodRegistry, MethodSource,
    ParameterDescriptor, SharedMethodRegistry,
};
