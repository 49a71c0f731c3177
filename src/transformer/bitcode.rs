use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::describe_bytes;
use super::{TransformError, Transformer};

/// Compact binary encoding through `bitcode`'s serde support.
pub struct BitcodeTransformer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> BitcodeTransformer<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for BitcodeTransformer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BitcodeTransformer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BitcodeTransformer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitcodeTransformer<{}>", std::any::type_name::<T>())
    }
}

impl<T: Serialize + DeserializeOwned> Transformer for BitcodeTransformer<T> {
    type Input = T;
    type Output = Vec<u8>;

    fn forward(&self, input: &T) -> Result<Vec<u8>, TransformError> {
        bitcode::serialize(input)
            .map_err(|e| TransformError::failed("bitcode", std::any::type_name::<T>(), e))
    }

    fn backward(&self, output: Vec<u8>) -> Result<T, TransformError> {
        bitcode::deserialize(&output)
            .map_err(|e| TransformError::failed("bitcode", describe_bytes(&output), e))
    }

    fn stage(&self) -> &'static str {
        "bitcode"
    }
}
