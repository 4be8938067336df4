//! # Argument Binder
//!
//! Turns an [`ArgumentDocument`] into exactly one typed value per declared
//! parameter, in parameter order. Binding never calls the method, so a
//! failed bind has no side effects beyond running default providers.

use super::descriptor::ParameterDescriptor;
use crate::codec::{BoundValue, Codec, CodecError};
use crate::document::{ArgumentDocument, NodeKind};
use crate::error::BindingError;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::trace;

/// Location suffix some codecs append to errors raised on an in-memory
/// document with no source text. `JsonCodec` never produces it; injected
/// codecs may. It carries no information, so diagnostics drop it.
const NO_SOURCE_LOCATION: &str = " at line 0 column 0";

/// Binds argument documents using an injected [`Codec`].
#[derive(Debug, Clone)]
pub struct ArgumentBinder {
    codec: Arc<dyn Codec>,
}

impl ArgumentBinder {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    pub fn bind(
        &self,
        parameters: &[ParameterDescriptor],
        args: ArgumentDocument<'_>,
    ) -> Result<Vec<BoundValue>, BindingError> {
        match args {
            ArgumentDocument::Positional(items) => self.bind_positional(parameters, items),
            ArgumentDocument::Named(entries) => self.bind_named(parameters, entries),
        }
    }

    fn bind_positional(
        &self,
        parameters: &[ParameterDescriptor],
        args: &[Value],
    ) -> Result<Vec<BoundValue>, BindingError> {
        if args.len() > parameters.len() {
            return Err(BindingError::TooManyPositionalArguments {
                expected: parameters.len(),
                actual: args.len(),
            });
        }

        let mut bound = Vec::with_capacity(parameters.len());
        for (index, parameter) in parameters.iter().enumerate() {
            let value = match args.get(index) {
                Some(node) => self.coerce(parameter, node)?,
                None => default_or_missing(parameter)?,
            };
            bound.push(value);
        }
        Ok(bound)
    }

    fn bind_named(
        &self,
        parameters: &[ParameterDescriptor],
        args: &Map<String, Value>,
    ) -> Result<Vec<BoundValue>, BindingError> {
        let mut bound = Vec::with_capacity(parameters.len());
        let mut consumed = 0;

        for parameter in parameters {
            match args.get(parameter.name()) {
                Some(node) => {
                    bound.push(self.coerce(parameter, node)?);
                    consumed += 1;
                }
                None => bound.push(default_or_missing(parameter)?),
            }
        }

        if consumed != args.len() {
            let declared: HashSet<&str> = parameters.iter().map(|p| p.name()).collect();
            let extra: BTreeSet<&str> = args
                .keys()
                .map(String::as_str)
                .filter(|name| !declared.contains(name))
                .collect();
            if !extra.is_empty() {
                let names: Vec<&str> = extra.into_iter().collect();
                return Err(BindingError::parameter_binding(
                    None,
                    format!("unrecognized argument names: [{}]", names.join(", ")),
                ));
            }
        }

        Ok(bound)
    }

    fn coerce(
        &self,
        parameter: &ParameterDescriptor,
        node: &Value,
    ) -> Result<BoundValue, BindingError> {
        if self.codec.is_null_like(node) && !parameter.is_nullable() {
            return Err(BindingError::null_argument(parameter.name()));
        }

        self.codec.decode(node, parameter.target()).map_err(|error| {
            trace!(parameter = parameter.name(), %error, "coercion failed");
            BindingError::parameter_binding(
                Some(parameter.name()),
                binding_error_message(parameter, node, &error),
            )
        })
    }
}

fn default_or_missing(parameter: &ParameterDescriptor) -> Result<BoundValue, BindingError> {
    parameter
        .default_value()
        .ok_or_else(|| BindingError::missing_argument(parameter.name()))
}

/// `Can't bind parameter '<name>' of type <T> to <KIND> value <literal> : <reason>`
pub(crate) fn binding_error_message(
    parameter: &ParameterDescriptor,
    node: &Value,
    error: &CodecError,
) -> String {
    format!(
        "Can't bind parameter '{}' of type {} to {} value {} : {}",
        parameter.name(),
        parameter.target(),
        NodeKind::of(node),
        node,
        strip_location_noise(&error.to_string()),
    )
}

pub(crate) fn strip_location_noise(message: &str) -> String {
    message.replace(NO_SOURCE_LOCATION, "")
}
