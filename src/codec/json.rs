//! # JSON Codec
//!
//! [`Codec`] implementation over `serde_json`.
//!
//! In [`CoercionMode::Lenient`] (the default) a scalar that fails to decode
//! gets one more attempt in its alternate scalar form: `"42"` can bind to
//! an integer parameter, `true` to a string parameter. Structured nodes are
//! never reshaped.

use super::{BoundValue, Codec, CodecError, TypeRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// How strictly scalars must match their target type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionMode {
    Strict,
    #[default]
    Lenient,
}

/// serde_json-backed codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    mode: CoercionMode,
}

impl JsonCodec {
    pub fn new(mode: CoercionMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(CoercionMode::Strict)
    }

    pub fn lenient() -> Self {
        Self::new(CoercionMode::Lenient)
    }

    pub fn mode(&self) -> CoercionMode {
        self.mode
    }

    /// The other scalar spelling of `node`, if it has one.
    fn alternate_scalar(node: &Value) -> Option<Value> {
        match node {
            Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
                Ok(parsed @ (Value::Number(_) | Value::Bool(_))) => Some(parsed),
                _ => None,
            },
            Value::Number(number) => Some(Value::String(number.to_string())),
            Value::Bool(flag) => Some(Value::String(flag.to_string())),
            _ => None,
        }
    }
}

impl Codec for JsonCodec {
    fn is_null_like(&self, node: &Value) -> bool {
        node.is_null()
    }

    fn decode(&self, node: &Value, target: &TypeRef) -> Result<BoundValue, CodecError> {
        let error = match target.decode_json(node.clone()) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if self.mode == CoercionMode::Lenient {
            if let Some(alternate) = Self::alternate_scalar(node) {
                if let Ok(value) = target.decode_json(alternate) {
                    trace!(target_type = %target, "coerced scalar to alternate form");
                    return Ok(value);
                }
            }
        }

        Err(CodecError::decode(target, error.to_string()))
    }

    fn encode(&self, value: BoundValue, target: &TypeRef) -> Result<Value, CodecError> {
        target.encode_json(&*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_null_like_is_json_null() {
        let codec = JsonCodec::default();
        assert!(codec.is_null_like(&Value::Null));
        assert!(!codec.is_null_like(&json!("")));
        assert!(!codec.is_null_like(&json!(0)));
        assert!(!codec.is_null_like(&json!([])));
    }

    #[test]
    fn test_decode_struct() {
        let codec = JsonCodec::default();
        let value = codec
            .decode(&json!({"x": 1, "y": -2}), &TypeRef::of::<Point>())
            .unwrap();
        assert_eq!(value.downcast_ref::<Point>(), Some(&Point { x: 1, y: -2 }));
    }

    #[test]
    fn test_lenient_string_to_number() {
        let codec = JsonCodec::lenient();
        let value = codec.decode(&json!(" 42 "), &TypeRef::of::<u32>()).unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&42));
    }

    #[test]
    fn test_lenient_scalar_to_string() {
        let codec = JsonCodec::lenient();
        let value = codec.decode(&json!(7), &TypeRef::of::<String>()).unwrap();
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("7"));

        let value = codec.decode(&json!(false), &TypeRef::of::<String>()).unwrap();
        assert_eq!(
            value.downcast_ref::<String>().map(String::as_str),
            Some("false")
        );
    }

    #[test]
    fn test_strict_rejects_string_number() {
        let codec = JsonCodec::strict();
        let err = codec
            .decode(&json!("42"), &TypeRef::of::<u32>())
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
        assert!(err.to_string().contains("invalid type: string \"42\""));
    }

    #[test]
    fn test_lenient_keeps_original_error_when_alternate_fails() {
        let codec = JsonCodec::lenient();
        let err = codec
            .decode(&json!("abc"), &TypeRef::of::<i64>())
            .unwrap_err();
        assert!(err.to_string().contains("invalid type: string \"abc\""));
    }

    #[test]
    fn test_lenient_does_not_reshape_structures() {
        let codec = JsonCodec::lenient();
        assert!(codec
            .decode(&json!([1, 2]), &TypeRef::of::<String>())
            .is_err());
    }

    #[test]
    fn test_encode_uses_declared_type() {
        let codec = JsonCodec::default();
        let value: BoundValue = Box::new(Point { x: 3, y: 4 });
        let node = codec.encode(value, &TypeRef::of::<Point>()).unwrap();
        assert_eq!(node, json!({"x": 3, "y": 4}));
    }

    #[test]
    fn test_coercion_mode_deserializes_snake_case() {
        let mode: CoercionMode = serde_json::from_value(json!("strict")).unwrap();
        assert_eq!(mode, CoercionMode::Strict);
    }
}
