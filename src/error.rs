//! Error types for the invocation core.
//!
//! Every failure a caller can observe is a variant of [`InvocationError`].
//! Binding failures are grouped under [`BindingError`] and carried through
//! unchanged by the engine.

use crate::codec::CodecError;
use crate::document::NodeKind;
use thiserror::Error;

/// Failures produced while binding an argument document to a parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("missing argument for parameter '{parameter}'")]
    MissingArgument { parameter: String },

    #[error("argument for parameter '{parameter}' may not be null")]
    NullArgument { parameter: String },

    /// Coercion failed for `parameter`, or, when `parameter` is `None`,
    /// the document carried argument names the method does not declare.
    #[error("{message}")]
    ParameterBinding {
        parameter: Option<String>,
        message: String,
    },

    #[error("too many positional arguments: expected at most {expected} but got {actual}")]
    TooManyPositionalArguments { expected: usize, actual: usize },
}

impl BindingError {
    pub fn missing_argument(parameter: impl Into<String>) -> Self {
        Self::MissingArgument {
            parameter: parameter.into(),
        }
    }

    pub fn null_argument(parameter: impl Into<String>) -> Self {
        Self::NullArgument {
            parameter: parameter.into(),
        }
    }

    pub fn parameter_binding(parameter: Option<&str>, message: impl Into<String>) -> Self {
        Self::ParameterBinding {
            parameter: parameter.map(str::to_string),
            message: message.into(),
        }
    }

    /// The parameter the failure is attributed to, if any.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::MissingArgument { parameter } | Self::NullArgument { parameter } => {
                Some(parameter)
            }
            Self::ParameterBinding { parameter, .. } => parameter.as_deref(),
            Self::TooManyPositionalArguments { .. } => None,
        }
    }
}

/// Every way `invoke` can fail.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("arguments must be ARRAY or OBJECT but encountered {encountered}")]
    Usage { encountered: NodeKind },

    #[error("method not found: {method}{}", suggestion_hint(.suggestions))]
    MethodNotFound {
        method: String,
        suggestions: Option<Vec<String>>,
    },

    #[error(transparent)]
    Binding(#[from] BindingError),

    /// The method itself failed. `cause` is exactly what the method returned.
    #[error("method '{method}' failed: {cause}")]
    InvocationFailure { method: String, cause: anyhow::Error },

    #[error("method '{method}' could not be called: {reason}")]
    AccessFailure { method: String, reason: String },

    #[error("failed to encode result of method '{method}': {source}")]
    ResultEncoding {
        method: String,
        #[source]
        source: CodecError,
    },
}

impl InvocationError {
    pub fn method_not_found(method: impl Into<String>, suggestions: Option<Vec<String>>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
            suggestions,
        }
    }

    /// The method's own failure, for downcasting to its concrete type.
    pub fn cause(&self) -> Option<&anyhow::Error> {
        match self {
            Self::InvocationFailure { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Suggested names carried by a `MethodNotFound`, if any were computed.
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::MethodNotFound {
                suggestions: Some(suggestions),
                ..
            } => Some(suggestions),
            _ => None,
        }
    }

    pub fn as_binding_error(&self) -> Option<&BindingError> {
        match self {
            Self::Binding(err) => Some(err),
            _ => None,
        }
    }

    /// True for failures detected before the method was called.
    pub fn is_pre_call(&self) -> bool {
        matches!(
            self,
            Self::Usage { .. } | Self::MethodNotFound { .. } | Self::Binding(_)
        )
    }
}

fn suggestion_hint(suggestions: &Option<Vec<String>>) -> String {
    match suggestions {
        Some(names) if !names.is_empty() => format!(" (did you mean: {}?)", names.join(", ")),
        _ => String::new(),
    }
}

pub type InvocationResult<T> = std::result::Result<T, InvocationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_found_display_with_suggestions() {
        let err = InvocationError::method_not_found(
            "gret",
            Some(vec!["greet".to_string(), "grete0".to_string()]),
        );
        assert_eq!(
            err.to_string(),
            "method not found: gret (did you mean: greet, grete0?)"
        );
        assert_eq!(err.suggestions().unwrap().len(), 2);
    }

    #[test]
    fn test_method_not_found_display_without_suggestions() {
        let err = InvocationError::method_not_found("gret", None);
        assert_eq!(err.to_string(), "method not found: gret");
        assert!(err.suggestions().is_none());

        let err = InvocationError::method_not_found("gret", Some(vec![]));
        assert_eq!(err.to_string(), "method not found: gret");
    }

    #[test]
    fn test_binding_error_is_transparent() {
        let err: InvocationError = BindingError::missing_argument("name").into();
        assert_eq!(err.to_string(), "missing argument for parameter 'name'");
        assert_eq!(err.as_binding_error().unwrap().parameter(), Some("name"));
        assert!(err.is_pre_call());
    }

    #[test]
    fn test_too_many_positional_display() {
        let err = BindingError::TooManyPositionalArguments {
            expected: 1,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "too many positional arguments: expected at most 1 but got 3"
        );
        assert_eq!(err.parameter(), None);
    }

    #[test]
    fn test_invocation_failure_keeps_cause() {
        #[derive(Debug, thiserror::Error)]
        #[error("boom")]
        struct Boom;

        let err = InvocationError::InvocationFailure {
            method: "explode".to_string(),
            cause: anyhow::Error::new(Boom),
        };
        assert!(err.cause().unwrap().downcast_ref::<Boom>().is_some());
        assert_eq!(err.to_string(), "method 'explode' failed: boom");
        assert!(!err.is_pre_call());
    }
}
