//! # Method Registry Infrastructure
//!
//! Name-addressed method dispatch over loosely-typed argument documents.
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── MethodDescriptor      (Parameters, return type, access, callable)
//! ├── ArgumentBinder        (Document → ordered typed arguments)
//! ├── InvocationEngine      (Resolve, bind, call, encode)
//! ├── suggest               (Bounded edit-distance ranking)
//! └── MethodRegistry        (Name → descriptor mapping, entry point)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use dispatch_core::registry::{MethodDescriptor, MethodRegistry};
//! use serde_json::json;
//!
//! let mut registry = MethodRegistry::new();
//! registry.register(
//!     MethodDescriptor::builder("greet")
//!         .param_with_default("name", || "stranger".to_string())
//!         .handler(|mut args| Ok(format!("Hello {}", args.take::<String>(0)?)))
//!         .build()
//!         .unwrap(),
//! );
//!
//! assert_eq!(registry.invoke("greet", &json!({"name": "henry"})).unwrap(), json!("Hello henry"));
//! assert_eq!(registry.invoke("greet", &json!([])).unwrap(), json!("Hello stranger"));
//! ```

pub mod binder;
pub mod descriptor;
pub mod invoker;
pub mod method_registry;
pub mod suggest;

pub use binder::ArgumentBinder;
pub use descriptor::{
    Access, BoundArgs, CallError, Callable, DefaultProvider, DescriptorError, MethodDescriptor,
    MethodDescriptorBuilder, MethodSource, ParameterDescriptor,
};
pub use invoker::{InvocationEngine, MethodTable};
pub use method_registry::{MethodRegistry, SharedMethodRegistry};
pub use suggest::{bounded_levenshtein, suggest, MAX_EDIT_DISTANCE, MAX_SUGGESTIONS};
