//! # Method Registry
//!
//! Owns the qualified-name → descriptor mapping and composes the binder,
//! invocation engine and suggestion engine behind one entry point.
//!
//! Registration takes `&mut self`, so every registration has finished before
//! the registry can be shared for concurrent invocation. Hosts that need to
//! keep registering while other threads invoke use [`SharedMethodRegistry`].

use super::descriptor::{MethodDescriptor, MethodSource};
use super::invoker::{InvocationEngine, MethodTable};
use super::suggest::suggest;
use crate::codec::{Codec, JsonCodec};
use crate::config::RegistryConfig;
use crate::error::InvocationResult;
use crate::logging::{log_invocation, log_registry_operation};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Registry of remotely callable methods.
#[derive(Debug)]
pub struct MethodRegistry {
    methods: MethodTable,
    engine: InvocationEngine,
    config: RegistryConfig,
}

impl MethodRegistry {
    /// Empty registry with the default JSON codec and configuration.
    pub fn new() -> Self {
        Self::from_config(RegistryConfig::default())
    }

    /// Empty registry whose codec follows `config.lenient_coercion`.
    pub fn from_config(config: RegistryConfig) -> Self {
        let codec = JsonCodec::new(config.coercion_mode());
        Self::with_codec(Arc::new(codec), config)
    }

    /// Empty registry using a caller-supplied codec.
    pub fn with_codec(codec: Arc<dyn Codec>, config: RegistryConfig) -> Self {
        Self {
            methods: MethodTable::new(),
            engine: InvocationEngine::new(codec, config.suggest_methods),
            config,
        }
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        self.engine.codec()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn is_suggest_methods(&self) -> bool {
        self.config.suggest_methods
    }

    pub fn set_suggest_methods(&mut self, enabled: bool) {
        self.config.suggest_methods = enabled;
        self.engine.set_suggest_methods(enabled);
    }

    pub fn namespace_separator(&self) -> &str {
        &self.config.namespace_separator
    }

    /// Applies to methods registered from now on. Existing keys are not
    /// rewritten.
    pub fn set_namespace_separator(&mut self, separator: impl Into<String>) {
        self.config.namespace_separator = separator.into();
    }

    /// Register `descriptor` under its qualified name. A method already
    /// registered under that name is replaced and returned.
    pub fn register(&mut self, descriptor: MethodDescriptor) -> Option<Arc<MethodDescriptor>> {
        let key = descriptor.qualified_name(&self.config.namespace_separator);
        let namespace = descriptor.namespace().map(str::to_string);
        let replaced = self.methods.insert(key.clone(), Arc::new(descriptor));

        if replaced.is_some() {
            warn!(method = %key, "replacing previously registered method");
        }
        log_registry_operation(
            "register",
            namespace.as_deref(),
            Some(key.as_str()),
            if replaced.is_some() { "replaced" } else { "registered" },
            None,
        );
        replaced
    }

    /// Register every descriptor, in order. Returns how many were registered,
    /// replacements included.
    pub fn register_all<I>(&mut self, descriptors: I) -> usize
    where
        I: IntoIterator<Item = MethodDescriptor>,
    {
        descriptors
            .into_iter()
            .map(|descriptor| self.register(descriptor))
            .count()
    }

    /// Register every method `source` exposes.
    pub fn scan<S>(&mut self, source: Arc<S>) -> usize
    where
        S: MethodSource + ?Sized,
    {
        let registered = self.register_all(source.methods());
        debug!(registered, "scanned method source");
        registered
    }

    /// Invoke `name` with an argument document (array or object) and return
    /// the encoded result.
    pub fn invoke(&self, name: &str, args: &Value) -> InvocationResult<Value> {
        let started = Instant::now();
        let result = self.engine.invoke(&self.methods, name, args);
        let duration_ms = u64::try_from(started.elapsed().as_millis()).ok();

        match &result {
            Ok(_) => log_invocation(name, "ok", duration_ms, None),
            Err(error) => log_invocation(name, "failed", duration_ms, Some(error.to_string().as_str())),
        }
        result
    }

    /// Up to five registered names close to `name`, best first. Ignores the
    /// suggestion toggle.
    pub fn suggest_methods(&self, name: &str) -> Vec<String> {
        suggest(name, self.methods.keys())
    }

    /// Read-only view of every registered descriptor.
    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodDescriptor>> + '_ {
        self.methods.values()
    }

    /// Registered qualified names, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle: registration takes the write lock, invocation the
/// read lock.
#[derive(Debug, Clone, Default)]
pub struct SharedMethodRegistry {
    inner: Arc<RwLock<MethodRegistry>>,
}

impl SharedMethodRegistry {
    pub fn new(registry: MethodRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn register(&self, descriptor: MethodDescriptor) -> Option<Arc<MethodDescriptor>> {
        self.inner.write().register(descriptor)
    }

    pub fn register_all<I>(&self, descriptors: I) -> usize
    where
        I: IntoIterator<Item = MethodDescriptor>,
    {
        self.inner.write().register_all(descriptors)
    }

    pub fn scan<S>(&self, source: Arc<S>) -> usize
    where
        S: MethodSource + ?Sized,
    {
        self.inner.write().scan(source)
    }

    pub fn invoke(&self, name: &str, args: &Value) -> InvocationResult<Value> {
        self.inner.read().invoke(name, args)
    }

    pub fn suggest_methods(&self, name: &str) -> Vec<String> {
        self.inner.read().suggest_methods(name)
    }

    pub fn method_names(&self) -> Vec<String> {
        self.inner.read().method_names()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` with read access to the underlying registry.
    pub fn with_registry<R>(&self, f: impl FnOnce(&MethodRegistry) -> R) -> R {
        f(&self.inner.read())
    }
}

impl From<MethodRegistry> for SharedMethodRegistry {
    fn from(registry: MethodRegistry) -> Self {
        Self::new(registry)
    }
}
