//! # Invocation Engine
//!
//! Resolve → bind → call → encode, with every failure mapped onto
//! [`InvocationError`].
//!
//! ```text
//! invoke(name, args)
//!   ├── ArgumentDocument::from_value   (Usage)
//!   ├── MethodTable lookup             (MethodNotFound + suggestions)
//!   ├── ArgumentBinder::bind           (Binding)
//!   ├── MethodDescriptor::call         (InvocationFailure / AccessFailure)
//!   └── Codec::encode                  (ResultEncoding)
//! ```

use super::binder::ArgumentBinder;
use super::descriptor::{CallError, MethodDescriptor};
use super::suggest::suggest;
use crate::codec::{BoundValue, Codec};
use crate::document::ArgumentDocument;
use crate::error::{InvocationError, InvocationResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Qualified name → descriptor.
pub type MethodTable = HashMap<String, Arc<MethodDescriptor>>;

/// Drives a single invocation against a method table.
#[derive(Debug, Clone)]
pub struct InvocationEngine {
    codec: Arc<dyn Codec>,
    binder: ArgumentBinder,
    suggest_methods: bool,
}

impl InvocationEngine {
    pub fn new(codec: Arc<dyn Codec>, suggest_methods: bool) -> Self {
        Self {
            binder: ArgumentBinder::new(Arc::clone(&codec)),
            codec,
            suggest_methods,
        }
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }

    pub fn suggest_methods(&self) -> bool {
        self.suggest_methods
    }

    pub fn set_suggest_methods(&mut self, enabled: bool) {
        self.suggest_methods = enabled;
    }

    #[instrument(level = "debug", skip_all, fields(method = %name))]
    pub fn invoke(&self, methods: &MethodTable, name: &str, args: &Value) -> InvocationResult<Value> {
        let document = ArgumentDocument::from_value(args)?;

        let Some(method) = methods.get(name) else {
            let suggestions = self
                .suggest_methods
                .then(|| suggest(name, methods.keys()));
            debug!(?suggestions, "method not found");
            return Err(InvocationError::method_not_found(name, suggestions));
        };

        let bound = self.binder.bind(method.parameters(), document)?;
        let result = self.call(method, name, bound)?;

        self.codec
            .encode(result, method.return_type())
            .map_err(|source| InvocationError::ResultEncoding {
                method: name.to_string(),
                source,
            })
    }

    fn call(
        &self,
        method: &MethodDescriptor,
        name: &str,
        bound: Vec<BoundValue>,
    ) -> InvocationResult<BoundValue> {
        match method.call(bound) {
            Ok(value) => Ok(value),
            Err(CallError::Failed(cause)) => Err(failure(name, cause)),
            Err(CallError::Inaccessible(bound)) => {
                debug!(access = ?method.access(), "relaxing access and retrying");
                method.relax_access();
                match method.call(bound) {
                    Ok(value) => Ok(value),
                    Err(CallError::Failed(cause)) => Err(failure(name, cause)),
                    Err(CallError::Inaccessible(_)) => {
                        warn!(access = ?method.access(), "method still inaccessible after relaxing access");
                        Err(InvocationError::AccessFailure {
                            method: name.to_string(),
                            reason: format!("access level {:?} does not permit calls", method.access()),
                        })
                    }
                }
            }
        }
    }
}

fn failure(name: &str, cause: anyhow::Error) -> InvocationError {
    warn!(error = %cause, "method failed");
    InvocationError::InvocationFailure {
        method: name.to_string(),
        cause,
    }
}
