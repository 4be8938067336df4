//! # Structured Document Codec
//!
//! Converts between value-nodes and typed Rust values.
//!
//! Typed values cross the engine as [`BoundValue`] (`Box<dyn Any + Send>`).
//! A [`TypeRef`] names a concrete target type and carries the monomorphized
//! serde functions for it, so a [`Codec`] can stay object safe while still
//! producing strongly-typed values.
//!
//! ```rust
//! use dispatch_core::codec::{Codec, JsonCodec, TypeRef};
//! use serde_json::json;
//!
//! let codec = JsonCodec::default();
//! let target = TypeRef::of::<u16>();
//! let value = codec.decode(&json!(8080), &target).unwrap();
//! assert_eq!(value.downcast_ref::<u16>(), Some(&8080));
//! ```

pub mod json;

pub use json::{CoercionMode, JsonCodec};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use thiserror::Error;

/// A typed value produced by decoding, a default provider, or a method call.
pub type BoundValue = Box<dyn Any + Send>;

type DecodeFn = fn(Value) -> Result<BoundValue, serde_json::Error>;
type EncodeFn = fn(&(dyn Any + Send)) -> Option<Result<Value, serde_json::Error>>;

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("{message}")]
    Decode { target: String, message: String },

    #[error("{message}")]
    Encode { target: String, message: String },

    #[error("value is not a {expected}")]
    TypeMismatch { expected: String },
}

impl CodecError {
    pub fn decode(target: &TypeRef, message: impl Into<String>) -> Self {
        Self::Decode {
            target: target.name(),
            message: message.into(),
        }
    }

    pub fn encode(target: &TypeRef, message: impl Into<String>) -> Self {
        Self::Encode {
            target: target.name(),
            message: message.into(),
        }
    }
}

/// Coercion target: a concrete Rust type that can be decoded from and
/// encoded to a value-node.
#[derive(Clone, Copy)]
pub struct TypeRef {
    type_id: TypeId,
    type_name: &'static str,
    decode: DecodeFn,
    encode: EncodeFn,
}

impl TypeRef {
    pub fn of<T>() -> Self
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            decode: decode_as::<T>,
            encode: encode_as::<T>,
        }
    }

    /// Short display name, module paths stripped (`Option<String>`).
    pub fn name(&self) -> String {
        short_type_name(self.type_name)
    }

    /// Fully qualified name as reported by the compiler.
    pub fn full_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Plain serde conversion of `node` into this type.
    pub fn decode_json(&self, node: Value) -> Result<BoundValue, serde_json::Error> {
        (self.decode)(node)
    }

    /// Plain serde conversion of `value` out of this type.
    pub fn encode_json(&self, value: &(dyn Any + Send)) -> Result<Value, CodecError> {
        match (self.encode)(value) {
            Some(Ok(node)) => Ok(node),
            Some(Err(e)) => Err(CodecError::encode(self, e.to_string())),
            None => Err(CodecError::TypeMismatch {
                expected: self.name(),
            }),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.type_name).finish()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeRef {}

fn decode_as<T>(node: Value) -> Result<BoundValue, serde_json::Error>
where
    T: DeserializeOwned + Send + 'static,
{
    serde_json::from_value::<T>(node).map(|value| Box::new(value) as BoundValue)
}

fn encode_as<T>(value: &(dyn Any + Send)) -> Option<Result<Value, serde_json::Error>>
where
    T: Serialize + 'static,
{
    value.downcast_ref::<T>().map(serde_json::to_value)
}

fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            path.push(ch);
        } else {
            out.push_str(last_segment(&path));
            path.clear();
            out.push(ch);
        }
    }
    out.push_str(last_segment(&path));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Bidirectional converter between value-nodes and typed values.
///
/// Implementations must be shareable across invoking threads.
pub trait Codec: Send + Sync + fmt::Debug {
    /// Whether `node` represents absence/null.
    fn is_null_like(&self, node: &Value) -> bool;

    /// Convert `node` into a value of `target`, or describe why it can't be.
    fn decode(&self, node: &Value, target: &TypeRef) -> Result<BoundValue, CodecError>;

    /// Convert a method's return value, declared as `target`, into a node.
    fn encode(&self, value: BoundValue, target: &TypeRef) -> Result<Value, CodecError>;
}
