//! # Method Descriptors
//!
//! Immutable metadata for a remotely callable method: its name, ordered
//! parameters, declared return type, access level, and the callable bound
//! to its owner.
//!
//! Descriptors are produced by whatever discovers methods on an object and
//! fed into the registry. The builder below is that seam:
//!
//! ```rust
//! use dispatch_core::registry::MethodDescriptor;
//!
//! let greet = MethodDescriptor::builder("greet")
//!     .param_with_default("name", || "stranger".to_string())
//!     .handler(|mut args| {
//!         let name: String = args.take(0)?;
//!         Ok(format!("Hello {name}"))
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(greet.qualified_name("."), "greet");
//! assert_eq!(greet.parameters().len(), 1);
//! ```

use crate::codec::{BoundValue, TypeRef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::{type_name, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Produces a parameter's default value. Invoked fresh on every use.
pub type DefaultProvider = Arc<dyn Fn() -> BoundValue + Send + Sync>;

/// The underlying method, already bound to its owner.
pub type Callable = Arc<dyn Fn(BoundArgs) -> anyhow::Result<BoundValue> + Send + Sync>;

/// Descriptor construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("method name cannot be empty")]
    EmptyMethodName,

    #[error("method '{method}' has a parameter with an empty name")]
    EmptyParameterName { method: String },

    #[error("method '{method}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { method: String, parameter: String },

    #[error("method '{method}' has no handler")]
    MissingHandler { method: String },

    #[error("default for parameter '{parameter}' of method '{method}' does not produce a {expected}")]
    DefaultTypeMismatch {
        method: String,
        parameter: String,
        expected: String,
    },
}

/// One declared parameter.
#[derive(Clone)]
pub struct ParameterDescriptor {
    name: String,
    target: TypeRef,
    nullable: bool,
    default: Option<DefaultProvider>,
    default_type: Option<TypeId>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, target: TypeRef) -> Self {
        Self {
            name: name.into(),
            target,
            nullable: false,
            default: None,
            default_type: None,
        }
    }

    pub fn of<T>(name: impl Into<String>) -> Self
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        Self::new(name, TypeRef::of::<T>())
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Attach a default. `T` must be the parameter's target type;
    /// [`MethodDescriptorBuilder::build`] rejects anything else.
    #[must_use]
    pub fn with_default<T, F>(mut self, provider: F) -> Self
    where
        T: Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(move || Box::new(provider()) as BoundValue));
        self.default_type = Some(TypeId::of::<T>());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &TypeRef {
        &self.target
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// False when a default is attached whose type differs from `target`.
    pub fn default_matches_target(&self) -> bool {
        self.default_type
            .map_or(true, |produced| produced == self.target.type_id())
    }

    /// A freshly produced default, or `None` when the parameter has none.
    pub fn default_value(&self) -> Option<BoundValue> {
        self.default.as_ref().map(|provider| provider())
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("nullable", &self.nullable)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

/// Who may call a method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Access {
    /// Callable from the start.
    #[default]
    Public,
    /// Refused until access is relaxed, which the engine does on first use.
    Restricted,
    /// Never callable; relaxation has no effect.
    Sealed,
}

/// Outcome of a refused or failed call.
pub enum CallError {
    /// The call was refused before it started. The arguments come back
    /// untouched so the call can be retried.
    Inaccessible(Vec<BoundValue>),
    /// The method ran and returned an error.
    Failed(anyhow::Error),
}

impl fmt::Debug for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Inaccessible(args) => {
                f.debug_tuple("Inaccessible").field(&args.len()).finish()
            }
            CallError::Failed(cause) => f.debug_tuple("Failed").field(cause).finish(),
        }
    }
}

/// Bound arguments handed to a method, one slot per parameter.
pub struct BoundArgs {
    slots: Vec<Option<BoundValue>>,
}

impl BoundArgs {
    pub fn new(values: Vec<BoundValue>) -> Self {
        Self {
            slots: values.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Move the argument at `index` out as a `T`.
    pub fn take<T: 'static>(&mut self, index: usize) -> anyhow::Result<T> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| anyhow::anyhow!("no argument at position {index}"))?;
        let value = slot
            .take()
            .ok_or_else(|| anyhow::anyhow!("argument at position {index} was already taken"))?;
        match value.downcast::<T>() {
            Ok(typed) => Ok(*typed),
            Err(original) => {
                *slot = Some(original);
                Err(anyhow::anyhow!(
                    "argument at position {index} is not a {}",
                    type_name::<T>()
                ))
            }
        }
    }

    /// Borrow the argument at `index` as a `T` without consuming it.
    pub fn get<T: 'static>(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for BoundArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundArgs")
            .field("len", &self.slots.len())
            .finish()
    }
}

/// Metadata and callable for one registered method.
pub struct MethodDescriptor {
    name: String,
    namespace: Option<String>,
    parameters: Vec<ParameterDescriptor>,
    return_type: TypeRef,
    access: Access,
    accessible: AtomicBool,
    callable: Callable,
}

impl MethodDescriptor {
    pub fn builder(name: impl Into<String>) -> MethodDescriptorBuilder {
        MethodDescriptorBuilder::new(name)
    }

    /// Unqualified method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Registry key: `namespace<separator>name`, or just `name`.
    pub fn qualified_name(&self, separator: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}{separator}{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible.load(Ordering::Acquire)
    }

    /// Allow calls to a `Restricted` method. Repeating this, from any
    /// number of threads, has no further effect. Returns whether the method
    /// is callable afterwards.
    pub fn relax_access(&self) -> bool {
        if self.access == Access::Sealed {
            return false;
        }
        self.accessible.store(true, Ordering::Release);
        true
    }

    /// Invoke the underlying method with one value per parameter.
    pub fn call(&self, args: Vec<BoundValue>) -> Result<BoundValue, CallError> {
        if args.len() != self.parameters.len() {
            return Err(CallError::Failed(anyhow::anyhow!(
                "method '{}' expects {} arguments but got {}",
                self.name,
                self.parameters.len(),
                args.len()
            )));
        }
        if !self.is_accessible() {
            return Err(CallError::Inaccessible(args));
        }
        (self.callable)(BoundArgs::new(args)).map_err(CallError::Failed)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("access", &self.access)
            .field("accessible", &self.is_accessible())
            .finish()
    }
}

/// Builder for [`MethodDescriptor`].
pub struct MethodDescriptorBuilder {
    name: String,
    namespace: Option<String>,
    parameters: Vec<ParameterDescriptor>,
    access: Access,
    handler: Option<(TypeRef, Callable)>,
}

impl MethodDescriptorBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            parameters: Vec::new(),
            access: Access::Public,
            handler: None,
        }
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Required, non-nullable parameter.
    #[must_use]
    pub fn param<T>(self, name: impl Into<String>) -> Self
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        self.parameter(ParameterDescriptor::of::<T>(name))
    }

    /// Required parameter that accepts null; the handler reads it as
    /// `Option<T>`.
    #[must_use]
    pub fn nullable_param<T>(self, name: impl Into<String>) -> Self
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        self.parameter(ParameterDescriptor::of::<Option<T>>(name).nullable(true))
    }

    /// Parameter that falls back to `provider()` when omitted.
    #[must_use]
    pub fn param_with_default<T, F>(self, name: impl Into<String>, provider: F) -> Self
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.parameter(ParameterDescriptor::of::<T>(name).with_default(provider))
    }

    /// Set the callable. The declared return type is `R`.
    #[must_use]
    pub fn handler<R, F>(mut self, handler: F) -> Self
    where
        R: Serialize + DeserializeOwned + Send + 'static,
        F: Fn(BoundArgs) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        let callable: Callable =
            Arc::new(move |args: BoundArgs| handler(args).map(|value| Box::new(value) as BoundValue));
        self.handler = Some((TypeRef::of::<R>(), callable));
        self
    }

    /// Bind `method` to `owner`, the way a method is bound to its instance.
    #[must_use]
    pub fn owned_by<O, R>(self, owner: Arc<O>, method: fn(&O, BoundArgs) -> anyhow::Result<R>) -> Self
    where
        O: Send + Sync + 'static,
        R: Serialize + DeserializeOwned + Send + 'static,
    {
        self.handler(move |args| method(owner.as_ref(), args))
    }

    pub fn build(self) -> Result<MethodDescriptor, DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::EmptyMethodName);
        }

        let mut seen = HashSet::new();
        for parameter in &self.parameters {
            if parameter.name().is_empty() {
                return Err(DescriptorError::EmptyParameterName {
                    method: self.name.clone(),
                });
            }
            if !seen.insert(parameter.name()) {
                return Err(DescriptorError::DuplicateParameter {
                    method: self.name.clone(),
                    parameter: parameter.name().to_string(),
                });
            }
            if !parameter.default_matches_target() {
                return Err(DescriptorError::DefaultTypeMismatch {
                    method: self.name.clone(),
                    parameter: parameter.name().to_string(),
                    expected: parameter.target().name(),
                });
            }
        }

        let (return_type, callable) = self.handler.ok_or_else(|| {
            DescriptorError::MissingHandler {
                method: self.name.clone(),
            }
        })?;

        Ok(MethodDescriptor {
            accessible: AtomicBool::new(self.access == Access::Public),
            name: self.name,
            namespace: self.namespace,
            parameters: self.parameters,
            return_type,
            access: self.access,
            callable,
        })
    }
}

/// An object that can describe its own remotely callable methods.
pub trait MethodSource {
    fn methods(self: Arc<Self>) -> Vec<MethodDescriptor>;
}
