use crate::transformer::{TransformError, Transformer};

/// What the Persister needs from its transformer chain: `encode` returning
/// `None` means "remove the key".
pub(crate) trait Codec<V, R>: Send + Sync {
    fn encode(&self, value: &V) -> Result<Option<R>, TransformError>;

    fn decode(&self, raw: R) -> Result<V, TransformError>;
}

/// Every value is stored.
pub(crate) struct Required<T>(pub T);

impl<T: Transformer> Codec<T::Input, T::Output> for Required<T> {
    fn encode(&self, value: &T::Input) -> Result<Option<T::Output>, TransformError> {
        self.0.forward(value).map(Some)
    }

    fn decode(&self, raw: T::Output) -> Result<T::Input, TransformError> {
        self.0.backward(raw)
    }
}

/// `None` is stored as absence; a stored value always reads back as `Some`.
pub(crate) struct Optional<T>(pub T);

impl<T: Transformer> Codec<Option<T::Input>, T::Output> for Optional<T> {
    fn encode(&self, value: &Option<T::Input>) -> Result<Option<T::Output>, TransformError> {
        match value {
            Some(value) => self.0.forward(value).map(Some),
            None => Ok(None),
        }
    }

    fn decode(&self, raw: T::Output) -> Result<Option<T::Input>, TransformError> {
        self.0.backward(raw).map(Some)
    }
}
