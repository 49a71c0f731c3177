//! Value - the primitive shapes a backend can physically store.
//!
//! Every backend that speaks "plain key-value" stores one of these. Native
//! Rust types move in and out through the [`Storable`] trait, which only
//! succeeds on an exact shape match.
//!
//! ## Example
//!
//! ```
//! use persist_rust::{Storable, Value};
//!
//! let value = vec![1i64, 2, 3].to_value();
//! assert_eq!(value, Value::List(vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)]));
//! assert_eq!(value.cast::<Vec<i64>>(), Some(vec![1, 2, 3]));
//!
//! // No implicit numeric conversion.
//! assert_eq!(Value::Int64(1).cast::<f64>(), None);
//! ```

mod storable;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use storable::Storable;

/// A value in the form a primitive key-value backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    Bool(bool),
    Int64(i64),
    Double(f64),
    Float(f32),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Bool(_) => "Bool",
            Value::Int64(_) => "Int64",
            Value::Double(_) => "Double",
            Value::Float(_) => "Float",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    /// Cast to a native type. `None` unless the shape matches exactly.
    pub fn cast<T: Storable>(&self) -> Option<T> {
        T::from_value(self)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

/// Bytes are written as base64 strings in text formats.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
