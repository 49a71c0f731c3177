use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::describe_bytes;
use super::{TransformError, Transformer};

/// Encodes any serde type as JSON bytes.
pub struct JsonTransformer<T> {
    pretty: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonTransformer<T> {
    pub fn new() -> Self {
        Self {
            pretty: false,
            _marker: PhantomData,
        }
    }

    /// Emit indented JSON. Decoding accepts both forms.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl<T> Default for JsonTransformer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonTransformer<T> {
    fn clone(&self) -> Self {
        Self::new().pretty(self.pretty)
    }
}

impl<T> fmt::Debug for JsonTransformer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonTransformer")
            .field("type", &std::any::type_name::<T>())
            .field("pretty", &self.pretty)
            .finish()
    }
}

impl<T: Serialize + DeserializeOwned> Transformer for JsonTransformer<T> {
    type Input = T;
    type Output = Vec<u8>;

    fn forward(&self, input: &T) -> Result<Vec<u8>, TransformError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(input)
        } else {
            serde_json::to_vec(input)
        };
        encoded.map_err(|e| TransformError::failed("json", std::any::type_name::<T>(), e))
    }

    fn backward(&self, output: Vec<u8>) -> Result<T, TransformError> {
        serde_json::from_slice(&output)
            .map_err(|e| TransformError::failed("json", describe_bytes(&output), e))
    }

    fn stage(&self) -> &'static str {
        "json"
    }
}
