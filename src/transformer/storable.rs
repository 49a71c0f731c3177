use std::fmt;
use std::marker::PhantomData;

use super::{TransformError, Transformer};
use crate::value::{Storable, Value};

/// Final stage for primitive key-value backends: casts `T` to and from
/// [`Value`].
///
/// Reading a value of the wrong shape fails with
/// [`TransformError::UnexpectedValueType`], carrying the stored value and
/// the name of `T`.
pub struct StorableTransformer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> StorableTransformer<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for StorableTransformer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for StorableTransformer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for StorableTransformer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorableTransformer<{}>", std::any::type_name::<T>())
    }
}

impl<T: Storable> Transformer for StorableTransformer<T> {
    type Input = T;
    type Output = Value;

    fn forward(&self, input: &T) -> Result<Value, TransformError> {
        Ok(input.to_value())
    }

    fn backward(&self, output: Value) -> Result<T, TransformError> {
        match T::from_value(&output) {
            Some(value) => Ok(value),
            None => Err(TransformError::unexpected_value_type(
                output,
                std::any::type_name::<T>(),
            )),
        }
    }

    fn stage(&self) -> &'static str {
        "storable"
    }
}
