//! # Document Model
//!
//! Value-nodes exchanged at the invocation boundary are plain
//! [`serde_json::Value`]s. This module adds the validated top-level
//! argument shape and the node-kind vocabulary used in diagnostics.

use crate::error::{InvocationError, InvocationResult};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of a value-node, named the way diagnostics print it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl NodeKind {
    pub fn of(node: &Value) -> Self {
        match node {
            Value::Null => NodeKind::Null,
            Value::Bool(_) => NodeKind::Boolean,
            Value::Number(_) => NodeKind::Number,
            Value::String(_) => NodeKind::String,
            Value::Array(_) => NodeKind::Array,
            Value::Object(_) => NodeKind::Object,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::Null => "NULL",
            NodeKind::Boolean => "BOOLEAN",
            NodeKind::Number => "NUMBER",
            NodeKind::String => "STRING",
            NodeKind::Array => "ARRAY",
            NodeKind::Object => "OBJECT",
        };
        f.write_str(label)
    }
}

/// A validated argument document: positional or named, nothing else.
#[derive(Debug, Clone, Copy)]
pub enum ArgumentDocument<'a> {
    Positional(&'a [Value]),
    Named(&'a Map<String, Value>),
}

impl<'a> ArgumentDocument<'a> {
    /// Accept an array or object; anything else is a usage error.
    pub fn from_value(args: &'a Value) -> InvocationResult<Self> {
        match args {
            Value::Array(items) => Ok(ArgumentDocument::Positional(items)),
            Value::Object(entries) => Ok(ArgumentDocument::Named(entries)),
            other => Err(InvocationError::Usage {
                encountered: NodeKind::of(other),
            }),
        }
    }

    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        match self {
            ArgumentDocument::Positional(items) => items.len(),
            ArgumentDocument::Named(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, ArgumentDocument::Positional(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_kind_labels() {
        assert_eq!(NodeKind::of(&json!(null)).to_string(), "NULL");
        assert_eq!(NodeKind::of(&json!(true)).to_string(), "BOOLEAN");
        assert_eq!(NodeKind::of(&json!(1.5)).to_string(), "NUMBER");
        assert_eq!(NodeKind::of(&json!("x")).to_string(), "STRING");
        assert_eq!(NodeKind::of(&json!([])).to_string(), "ARRAY");
        assert_eq!(NodeKind::of(&json!({})).to_string(), "OBJECT");
    }

    #[test]
    fn test_array_and_object_are_accepted() {
        let positional = json!([1, 2]);
        let doc = ArgumentDocument::from_value(&positional).unwrap();
        assert!(doc.is_positional());
        assert_eq!(doc.len(), 2);

        let named = json!({"a": 1});
        let doc = ArgumentDocument::from_value(&named).unwrap();
        assert!(!doc.is_positional());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_scalar_top_level_is_usage_error() {
        let scalar = json!("hello");
        let err = ArgumentDocument::from_value(&scalar).unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Usage {
                encountered: NodeKind::String
            }
        ));
        assert_eq!(
            err.to_string(),
            "arguments must be ARRAY or OBJECT but encountered STRING"
        );
    }

    #[test]
    fn test_null_top_level_is_usage_error() {
        let err = ArgumentDocument::from_value(&Value::Null).unwrap_err();
        assert!(matches!(
            err,
            InvocationError::Usage {
                encountered: NodeKind::Null
            }
        ));
    }
}
